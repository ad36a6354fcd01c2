use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskrelay", version, about = "Submit and poll asynchronous video generation tasks")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Overrides the configured channel base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Overrides the configured channel API key.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub prompt: Option<String>,

    /// Image URL or data URI used as the first frame.
    #[arg(long)]
    pub input_reference: Option<String>,

    /// Resolution such as 720p, or explicit dimensions.
    #[arg(long)]
    pub size: Option<String>,

    /// Seconds; 0 or less uses the channel default.
    #[arg(long, allow_negative_numbers = true)]
    pub duration: Option<i64>,

    /// Vendor overrides as an inline JSON object.
    #[arg(long, group = "meta")]
    pub metadata: Option<String>,

    /// Vendor overrides read from a JSON file.
    #[arg(long, group = "meta")]
    pub metadata_file: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PollArgs {
    pub task_id: String,

    /// Model name to report in the projected video task.
    #[arg(long, default_value = "")]
    pub model: String,

    /// Progress string as tracked by the caller, e.g. "30%".
    #[arg(long, default_value = "")]
    pub progress: String,

    /// Unix seconds the task was created, if known.
    #[arg(long, default_value_t = 0)]
    pub created_at: i64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Submit(SubmitArgs),
    Poll(PollArgs),
    Models,
}
