use std::io;
use std::io::Write;

use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

use prettysax::{indent_reader, Error, WriterOptions};

fn main() {
	SimpleLogger::init(LevelFilter::Warn, Config::default()).expect("failed to initialize logging");
	let opts = WriterOptions::default().strip_blank_lines(true);
	let out = match indent_reader(io::stdin(), opts) {
		Ok(out) => out,
		Err(Error::IO(e)) => panic!("I/O error: {}", e),
		Err(e) => panic!("invalid XML on input: {}", e),
	};
	io::stdout()
		.write_all(out.as_bytes())
		.expect("failed to write to stdout");
}
