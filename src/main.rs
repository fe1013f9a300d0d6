use anyhow::Result;
use clap::Parser;
use taskwright::agent::{TaskAgent, TaskReport};
use taskwright::cli::Cli;
use taskwright::config::Settings;
use taskwright::utils;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let cli = Cli::parse();
    let mut agent = TaskAgent::from_settings(settings).await?;

    match cli.task {
        Some(task) => single_task_mode(&mut agent, &task).await,
        None => interactive_mode(&mut agent).await,
    }
}

/// Run the agent in an interactive loop until quit or EOF
async fn interactive_mode(agent: &mut TaskAgent) -> Result<()> {
    utils::print_header("Task Automation Agent");
    utils::print_info("Type your tasks or 'quit' to exit\n");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("Task: ");
        let mut input = String::new();
        let bytes_read = reader.read_line(&mut input).await?;
        if bytes_read == 0 {
            // EOF
            break;
        }

        let task = input.trim();
        if task.is_empty() {
            continue;
        }
        if matches!(task.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        utils::print_info("\nProcessing...");
        let report = agent.run(task).await;
        render_report(&report);
        println!();
    }

    utils::print_info("Goodbye!");
    Ok(())
}

/// Execute a single task and exit
async fn single_task_mode(agent: &mut TaskAgent, task: &str) -> Result<()> {
    utils::print_info(&format!("Processing: {}", task));
    let report = agent.run(task).await;
    render_report(&report);
    Ok(())
}

fn render_report(report: &TaskReport) {
    if report.success {
        utils::print_success("\nResult:");
        println!("{}", report.output);
        if !report.steps.is_empty() {
            utils::print_info(&format!("Steps taken: {}", report.steps.len()));
        }
        if report.context_used {
            utils::print_info(&format!(
                "Used {} lines of conversation context",
                report.context_lines
            ));
        }
    } else {
        utils::print_error(&format!(
            "\nError: {}",
            report.error.as_deref().unwrap_or("unknown failure")
        ));
    }
}
