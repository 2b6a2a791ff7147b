use std::{fmt, io};
use io::{BufRead, Write};

use ansi_term::Colour::{Blue, Green, Red};
use wshape::{Config, Context, Object, SymbolTable, Value};

/// A parsed line of input.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    /// `name = value`
    Set(&'a str, Value),

    /// `name`
    Get(&'a str),

    /// `:map`: print the current object's map chain.
    Map,

    /// `:new`: start a fresh object.
    New,

    /// `:copy`: duplicate the current object.
    Copy,

    /// `:list`: print every object.
    List,
}

/// Returns `true` if `name` can be used as a property name.
fn is_name(name: &str) -> bool {
    let mut cs = name.chars();
    if let Some(c) = cs.next() {
        if !matches!(c, '_' | 'A'..='Z' | 'a'..='z') { return false; }
        cs.all(|c| matches!(c, '_' | '0'..='9' | 'A'..='Z' | 'a'..='z'))
    } else { false }
}

/// Parse `line`. Returns `Ok(None)` for a blank line.
fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() { return Ok(None); }
    Ok(Some(match line {
        ":map" => Command::Map,
        ":new" => Command::New,
        ":copy" => Command::Copy,
        ":list" => Command::List,
        _ if line.starts_with(':') => Err(format!("Unknown command {}", line))?,
        _ => if let Some((name, value)) = line.split_once('=') {
            let name = name.trim();
            if !is_name(name) { return Err(format!("Invalid identifier {:?}", name)); }
            let value = value.trim().parse::<Value>()
                .map_err(|e| format!("Invalid integer literal: {}", e))?;
            Command::Set(name, value)
        } else if is_name(line) {
            Command::Get(line)
        } else {
            Err(format!("Invalid identifier {:?}", line))?
        },
    }))
}

// ----------------------------------------------------------------------------

pub struct Repl {
    cx: Context,
    symbols: SymbolTable,
    objects: Vec<Object>,
    current: usize,

    /// `true` once the input is exhausted.
    pub is_complete: bool,
}

impl Repl {
    pub fn new(config: &Config) -> wshape::Result<Self> {
        let mut cx = Context::with_config(config)?;
        let object = cx.new_object()?;
        Ok(Self {cx, symbols: SymbolTable::new(), objects: vec![object], current: 0, is_complete: false})
    }

    /// Describe `object` as `Map(n) {name: value, ...}`.
    fn describe(&self, object: &Object) -> String {
        let slots: Vec<String> = self.cx.ids(object.map()).into_iter().zip(object.slots())
            .map(|(id, value)| format!("{}: {}", self.symbols.name(id).unwrap_or("?"), value))
            .collect();
        format!("{:?} {{{}}}", object.map(), slots.join(", "))
    }

    /// Execute `command`, returning the text to print.
    fn run(&mut self, command: Command) -> wshape::Result<String> {
        Ok(match command {
            Command::Set(name, value) => {
                let id = self.symbols.intern(name);
                let index = self.objects[self.current].set(&mut self.cx, id, value)?;
                format!("{}[{}] = {}", name, index, value)
            },
            Command::Get(name) => {
                let object = &self.objects[self.current];
                match self.symbols.get(name).and_then(|id| object.get(&self.cx, id)) {
                    Some(value) => value.to_string(),
                    None => format!("{} is absent", name),
                }
            },
            Command::Map => {
                let mut lines = Vec::new();
                let mut map = self.objects[self.current].map();
                while let Some(parent) = self.cx.map(map).parent() {
                    let m = self.cx.map(map);
                    let id = m.id().map_or("?", |id| self.symbols.name(id).unwrap_or("?"));
                    lines.push(format!("{:?}: {}@{}", map, id, m.index().unwrap_or(0)));
                    map = parent;
                }
                lines.push(format!("{:?}: empty", map));
                lines.join("\n")
            },
            Command::New => {
                let object = self.cx.new_object()?;
                self.objects.push(object);
                self.current = self.objects.len() - 1;
                format!("object {}", self.current)
            },
            Command::Copy => {
                let object = self.cx.copy_object(&self.objects[self.current])?;
                self.objects.push(object);
                self.current = self.objects.len() - 1;
                format!("object {}", self.current)
            },
            Command::List => {
                let lines: Vec<String> = self.objects.iter().enumerate()
                    .map(|(i, object)| {
                        let marker = if i == self.current { "*" } else { " " };
                        format!("{}{} {}", marker, i, self.describe(object))
                    })
                    .collect();
                lines.join("\n")
            },
        })
    }

    /// Read, parse and execute one line.
    pub fn command(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
        write!(output, "{} ", Blue.paint(">"))?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            self.is_complete = true;
            return Ok(());
        }
        match parse(&line) {
            Ok(None) => {},
            Ok(Some(command)) => match self.run(command) {
                Ok(text) => writeln!(output, "{}", Green.paint(text))?,
                Err(e) => writeln!(output, "{}", Red.paint(e.to_string()))?,
            },
            Err(msg) => writeln!(output, "{}", Red.paint(msg))?,
        }
        Ok(())
    }
}

impl fmt::Debug for Repl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Repl")
            .field("cx", &self.cx)
            .field("objects", &self.objects.len())
            .field("current", &self.current)
            .finish()
    }
}

// ----------------------------------------------------------------------------

/// Log to stderr if `RUST_LOG` is set, e.g. `RUST_LOG=wshape=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> io::Result<()> {
    init_tracing();
    let config = Config::from_env();
    let mut repl = Repl::new(&config)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    writeln!(output, "Welly objects! `name = value`, `name`, :map, :new, :copy, :list")?;
    while !repl.is_complete {
        repl.command(&mut input, &mut output)?;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
