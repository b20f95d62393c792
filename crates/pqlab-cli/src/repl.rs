//! Line-oriented front end for the interactive sessions

use std::io::{self, BufRead, Write};

use pqlab_core::codec::format_bytes;
use pqlab_core::{LogEntry, KemSession, RenderOptions, SignatureSession};
use pqlab_crypto::{Algorithm, MlKemLevel, SignatureScheme};

/// One interactive session driven by typed commands
pub trait Repl {
    fn prompt(&self) -> String;
    fn help(&self) -> &'static str;
    fn log(&self) -> &[LogEntry];
    fn show(&self) -> String;
    /// Handle one command. `Err` is shown to the user and the loop continues.
    fn handle(&mut self, command: &str, arg: &str) -> Result<(), String>;
}

pub fn run(mut repl: impl Repl) -> anyhow::Result<()> {
    println!("{}", repl.help());
    let mut printed = print_log(repl.log(), 0);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{}> ", repl.prompt());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "exit" | "q" => break,
            "help" | "?" => println!("{}", repl.help()),
            "show" => print!("{}", repl.show()),
            "log" => {
                print_log(repl.log(), 0);
            }
            _ => {
                if let Err(e) = repl.handle(command, arg) {
                    println!("{}", e);
                }
            }
        }

        // A parameter change clears the log
        if repl.log().len() < printed {
            printed = 0;
        }
        printed = print_log(repl.log(), printed);
    }
    Ok(())
}

fn print_log(log: &[LogEntry], from: usize) -> usize {
    for entry in log.iter().skip(from) {
        println!("  [{}] {}", entry.at.format("%H:%M:%S"), entry.message);
    }
    log.len()
}

pub fn parse_kem_level(value: &str) -> anyhow::Result<MlKemLevel> {
    let value = value.trim();
    let key = if value.chars().all(|c| c.is_ascii_digit()) {
        format!("ml_kem{}", value)
    } else {
        value.to_string()
    };
    Ok(key.parse::<Algorithm>()?.kem_level()?)
}

fn field(out: &mut String, label: &str, bytes: Option<&[u8]>, opts: RenderOptions) {
    let line = match bytes {
        Some(bytes) => format!(
            "  {} ({} bytes): {}\n",
            label,
            bytes.len(),
            format_bytes(bytes, opts.format, opts.expanded, opts.limit)
        ),
        None => format!("  {}: -\n", label),
    };
    out.push_str(&line);
}

pub struct KemRepl {
    session: KemSession,
    opts: RenderOptions,
}

impl KemRepl {
    pub fn new(level: MlKemLevel, opts: RenderOptions) -> Self {
        Self {
            session: KemSession::new(level),
            opts,
        }
    }
}

impl Repl for KemRepl {
    fn prompt(&self) -> String {
        Algorithm::MlKem(self.session.level()).key()
    }

    fn help(&self) -> &'static str {
        "ML-KEM session. Commands:
  keygen              generate a key pair (Alice)
  encaps              encapsulate a shared secret to the public key (Bob)
  decaps              recover the shared secret with the secret key (Alice)
  encrypt <text>      AES-GCM encrypt with the shared secret, prints hex
  decrypt <hex|array> AES-GCM decrypt with the shared secret
  level <512|768|1024>
  show | log | help | quit"
    }

    fn log(&self) -> &[LogEntry] {
        self.session.log()
    }

    fn show(&self) -> String {
        let s = &self.session;
        let mut out = format!("{}\n", Algorithm::MlKem(s.level()).label());
        let keys = s.key_pair();
        field(&mut out, "Public Key", keys.map(|k| k.public_key.as_slice()), self.opts);
        field(&mut out, "Secret Key", keys.map(|k| k.secret_key.as_bytes()), self.opts);
        field(&mut out, "Cipher Text", s.cipher_text(), self.opts);
        field(&mut out, "Shared Secret", s.shared_secret().map(|b| b.as_bytes()), self.opts);
        field(
            &mut out,
            "Decapsulated Secret",
            s.decapsulated_secret().map(|b| b.as_bytes()),
            self.opts,
        );
        out
    }

    fn handle(&mut self, command: &str, arg: &str) -> Result<(), String> {
        match command {
            "keygen" => self.session.generate_key_pair(),
            "encaps" => self.session.encapsulate(),
            "decaps" => self.session.decapsulate(),
            "encrypt" => {
                if let Some(hex) = self.session.encrypt_message(arg) {
                    println!("  {}", hex);
                }
            }
            "decrypt" => {
                if let Some(plaintext) = self.session.decrypt_message(arg) {
                    println!("  {}", plaintext);
                }
            }
            "level" => {
                let level = parse_kem_level(arg).map_err(|e| e.to_string())?;
                self.session.set_level(level);
            }
            other => return Err(format!("Unknown command: {} (try `help`)", other)),
        }
        Ok(())
    }
}

pub struct SignRepl {
    session: SignatureSession,
    opts: RenderOptions,
}

impl SignRepl {
    pub fn new(scheme: SignatureScheme, opts: RenderOptions) -> Self {
        Self {
            session: SignatureSession::new(scheme),
            opts,
        }
    }
}

fn verdict(result: Option<bool>) -> &'static str {
    match result {
        Some(true) => "✓ Valid",
        Some(false) => "✗ Invalid",
        None => "-",
    }
}

impl Repl for SignRepl {
    fn prompt(&self) -> String {
        Algorithm::from(self.session.scheme()).key()
    }

    fn help(&self) -> &'static str {
        "Signature session. Commands:
  keygen              generate a key pair
  message <text>      set the message to sign
  sign | verify       sign or verify the message
  file <path>         select a file
  sign-file | verify-file
  scheme <algorithm>  switch parameter set, e.g. ml_dsa87 or slh_dsa_sha2_128f
  show | log | help | quit"
    }

    fn log(&self) -> &[LogEntry] {
        self.session.log()
    }

    fn show(&self) -> String {
        let s = &self.session;
        let mut out = format!("{}\n", Algorithm::from(s.scheme()).label());
        let keys = s.key_pair();
        field(&mut out, "Public Key", keys.map(|k| k.public_key.as_slice()), self.opts);
        field(&mut out, "Secret Key", keys.map(|k| k.secret_key.as_bytes()), self.opts);
        out.push_str(&format!("  Message: {}\n", s.message()));
        field(&mut out, "Signature", s.signature(), self.opts);
        out.push_str(&format!("  Verification: {}\n", verdict(s.verify_result())));
        match s.file() {
            Some(path) => out.push_str(&format!("  File: {}\n", path.display())),
            None => out.push_str("  File: -\n"),
        }
        field(&mut out, "File Signature", s.file_signature(), self.opts);
        out.push_str(&format!(
            "  File Verification: {}\n",
            verdict(s.file_verify_result())
        ));
        out
    }

    fn handle(&mut self, command: &str, arg: &str) -> Result<(), String> {
        match command {
            "keygen" => self.session.generate_key_pair(),
            "message" => self.session.set_message(arg),
            "sign" => self.session.sign_message(),
            "verify" => self.session.verify_message(),
            "file" => self.session.select_file(arg),
            "sign-file" => self.session.sign_file(),
            "verify-file" => self.session.verify_file(),
            "scheme" => {
                let scheme = arg
                    .parse::<Algorithm>()
                    .and_then(|a| a.signature_scheme())
                    .map_err(|e| e.to_string())?;
                self.session.set_scheme(scheme);
            }
            other => return Err(format!("Unknown command: {} (try `help`)", other)),
        }
        Ok(())
    }
}
