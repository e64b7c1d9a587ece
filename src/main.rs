use anyhow::Context;
use clap::{arg, command, ArgAction, ArgMatches, Command};
use std::fs::File;
use std::io::BufReader;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compress")
                .about("Huffman-compress a file")
                .arg(arg!(input: <INPUT> "File to compress"))
                .arg(arg!(output: <OUTPUT> "Where to write the compressed file"))
                .arg(
                    arg!(-f --force "Write the output even if it saves no space")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("decompress")
                .about("Restore a file written by `compress`")
                .arg(arg!(input: <INPUT> "Compressed file"))
                .arg(arg!(output: <OUTPUT> "Where to write the restored file")),
        )
        .subcommand(
            Command::new("codes")
                .about("Show the counts and codes a file would be compressed with")
                .arg(arg!(input: <INPUT> "File to inspect")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("compress", matches)) => compress(matches),
        Some(("decompress", matches)) => decompress(matches),
        Some(("codes", matches)) => show_codes(matches),
        _ => unreachable!("a subcommand is required"),
    }
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> anyhow::Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing <{}>", name.to_uppercase()))
}

fn compress(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = path_arg(matches, "input")?;
    let output = path_arg(matches, "output")?;
    let force = matches.get_one::<bool>("force").copied().unwrap_or(false);

    let bits = huff::encode_file(input, output, force)
        .with_context(|| format!("Couldn't compress {input} into {output}"))?;

    if bits == 0 {
        println!("Not worth compressing {input}; use --force to write it anyway");
    } else {
        println!("Wrote {bits} bits to {output}");
    }
    Ok(())
}

fn decompress(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = path_arg(matches, "input")?;
    let output = path_arg(matches, "output")?;

    let bits = huff::decode_file(input, output)
        .with_context(|| format!("Couldn't decompress {input} into {output}"))?;

    println!("Wrote {bits} bits to {output}");
    Ok(())
}

fn show_codes(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = path_arg(matches, "input")?;

    let reader = BufReader::new(File::open(input).with_context(|| format!("Couldn't open {input}"))?);
    let encoder = huff::Encoder::from_reader(reader)?;
    let counts = encoder.counts();

    let table = encoder.code_table();
    for (symbol, _) in table.iter() {
        // the sentinel is always emitted once
        let count = symbol.as_byte().map_or(1, |b| counts.get(b));
        let code = table.code_string(symbol).unwrap_or_default();
        println!("\t{symbol}\t{count}\t{code}");
    }

    println!("Header: {} bits", encoder.header_size());
    println!("Original: {} bits", encoder.original_bits());
    println!("Compressed: {} bits", encoder.compressed_bits());
    Ok(())
}
