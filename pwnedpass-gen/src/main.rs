use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};

use pwnedpass_gen::{generate, Error};

#[derive(Parser, Debug)]
#[command(name = "pwnedpass-gen")]
#[command(about = "Build the offline pwned-passwords database from sorted HASH:COUNT lines")]
struct Args {
    /// Output database file
    #[arg(default_value = pwnedpass::DATABASE_FILENAME)]
    output: PathBuf,

    /// Input file of HASH:COUNT lines, gzip-compressed if it ends in .gz
    /// (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)?;
            if path.extension().is_some_and(|ext| ext == "gz") {
                Box::new(BufReader::new(GzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            }
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let progress = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {human_pos} records")
                .expect("Invalid progress bar template"),
        );
        Some(pb)
    };

    let records = generate(input, &args.output, |n| {
        if let Some(pb) = &progress {
            if n % (64 << 10) == 0 {
                pb.set_position(n);
            }
        }
    })?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    println!("Wrote {} records to {:?}", records, args.output);
    Ok(())
}
