//! # xrayfig
//!
//! Command-line front end for the xrayfig editor.
//!
//! ```sh
//! xrayfig -f config.json                     # list fields
//! xrayfig -f config.json get "Server Port"
//! xrayfig -f config.json set "Server Port=8443" "SOCKS UDP=on"
//! xrayfig -f config.json paste 'vless://id@host:443?security=reality&pbk=KEY'
//! wl-paste | xrayfig -f config.json paste    # link from the clipboard
//! xrayfig -f config.json new
//! ```

mod logging;

use std::io::Read;

use clap::Parser;

use xrayfig::{EditorAction, EditorArgs, EditorSettings, XrayfigError};

/// Edit the everyday fields of an Xray config.json.
#[derive(Parser, Debug)]
#[command(name = "xrayfig", version)]
struct Cli {
    #[command(flatten)]
    editor: EditorArgs,
}

fn main() {
    let cli = Cli::parse();

    let settings = EditorSettings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load settings:\n{e}");
        std::process::exit(1);
    });
    logging::init(&settings.log_level);

    let file = cli.editor.file.clone();
    let action = match cli.editor.into_action() {
        EditorAction::Paste { link: None } => EditorAction::Paste {
            link: Some(read_stdin().unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            })),
        },
        other => other,
    };

    match xrayfig::handle(&action, file.as_deref(), &settings) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// The clipboard stand-in: whatever was piped in.
fn read_stdin() -> Result<String, XrayfigError> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| XrayfigError::IoError {
            path: "<stdin>".into(),
            source: e,
        })?;
    Ok(text)
}
