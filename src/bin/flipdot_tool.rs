use std::error::Error;
use std::fs;
use std::io::{self, Read};

use clap::{Parser, Subcommand};

use flipdot_codec::{
    encode, parse_ansi_matrix, single_pixel_payload, PanelConfig, Payload,
};

#[derive(Parser)]
#[command(name = "flipdot-tool", about = "Encode matrices into flipdot wire payloads")]
struct Cli {
    #[arg(long, global = true)]
    hole: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Render { path: String },
    Pixel { segment: String, row: usize, col: usize },
    Blank,
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn print_payloads(payloads: &[Payload]) {
    for payload in payloads {
        let bytes = payload.to_bytes();
        let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{}", hex.join(" "));
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = if cli.hole {
        PanelConfig::standard_with_hole()
    } else {
        PanelConfig::standard()
    };

    match cli.command {
        Command::Render { path } => {
            let text = read_input(&path)?;
            let lines: Vec<&str> = text.lines().collect();
            let (matrix, warnings) = parse_ansi_matrix(&lines, &config);
            #[cfg(feature = "logging")]
            for warning in &warnings {
                log::warn!("{:?}", warning);
            }
            #[cfg(not(feature = "logging"))]
            let _ = &warnings;
            let payloads = encode(&matrix, &config)?;
            print_payloads(&payloads);
        }
        Command::Pixel { segment, row, col } => {
            match single_pixel_payload(&config, &segment, row, col) {
                Some(payload) => print_payloads(std::slice::from_ref(&payload)),
                None => return Err(format!("no such pixel: {} ({}, {})", segment, row, col).into()),
            }
        }
        Command::Blank => {
            print_payloads(&flipdot_codec::blank_payloads(&config));
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    run()
}
