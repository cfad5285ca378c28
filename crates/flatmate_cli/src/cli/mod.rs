use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "flatmate",
    author,
    version,
    about = "Turn flat chat into a ledger of who promised to do what",
    long_about = None
)]
pub struct Cli {
    /// Mark PERSON's pending tasks mentioning KEYWORD as done
    ///
    /// Example: flatmate --done Sam rent
    #[arg(
        long,
        num_args = 2,
        value_names = ["PERSON", "KEYWORD"],
        conflicts_with = "remind"
    )]
    pub done: Option<Vec<String>>,

    /// Report pending tasks now and then periodically until stopped
    ///
    /// Example: flatmate --remind
    #[arg(long)]
    pub remind: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

/// What a single invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read a chat transcript from stdin and record its commitments.
    Capture,
    Done { person: String, keyword: String },
    Remind,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.remind {
            return Mode::Remind;
        }

        match self.done.as_deref() {
            Some([person, keyword]) => Mode::Done {
                person: person.clone(),
                keyword: keyword.clone(),
            },
            _ => Mode::Capture,
        }
    }
}
