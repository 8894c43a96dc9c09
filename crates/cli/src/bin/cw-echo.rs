//! Demo child for trying out `cw`.
//!
//! Writes six greetings alternating between stderr and stdout, then echoes
//! every stdin line back on stdout until it reads `exit`.

use std::io::{stdin, BufRead};
use std::thread::sleep;
use std::time::Duration;

const GREETINGS: usize = 6;

fn main() {
    for i in 0..GREETINGS {
        if i % 2 == 0 {
            eprintln!("Hello, stderr!");
        } else {
            println!("Hello, stdout!");
        }
        sleep(Duration::from_millis(100));
    }

    for line in stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line == "exit" {
            break;
        }
        println!("{line}");
    }
}
