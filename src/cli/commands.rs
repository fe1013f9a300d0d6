use clap::Parser;

#[derive(Parser)]
#[command(name = "taskwright")]
#[command(author, version, about = "Task automation agent with tool calling and conversation memory", long_about = None)]
pub struct Cli {
    /// Single task to execute (skips interactive mode)
    #[arg(short, long)]
    pub task: Option<String>,
}
