use argh::FromArgs;
use ord_inscribe::{Brc20, Inscription as _, InscriptionEnvelope};

#[derive(FromArgs, Debug)]
#[argh(description = "Print the envelope script of an inscription")]
struct Args {
    #[argh(option, short = 'c', default = "String::from(\"text/plain;charset=utf-8\")")]
    /// content type
    content_type: String,

    #[argh(switch, short = 'b')]
    /// parse the content as a BRC-20 operation
    brc20: bool,

    #[argh(switch, short = 'd')]
    /// decode the content as an hex encoded envelope instead
    decode: bool,

    #[argh(positional)]
    /// content
    content: String,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let envelope = if args.decode {
        let script = bitcoin::ScriptBuf::from_bytes(hex::decode(args.content.trim())?);
        InscriptionEnvelope::decode(&script)?
    } else if args.brc20 {
        args.content.parse::<Brc20>()?.envelope()?
    } else {
        InscriptionEnvelope::new(args.content_type, args.content)?
    };

    println!("content type: {}", envelope.content_type());
    println!("content: {}", String::from_utf8_lossy(envelope.content()));
    println!("script: {}", envelope.script());
    println!("hex: {}", hex::encode(envelope.script().as_bytes()));

    Ok(())
}
