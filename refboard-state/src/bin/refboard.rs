//! Refboard console entry point.

use refboard_core::{ConsoleConfig, Entity, FilterTab};
use refboard_state::store::CollectionStats;
use refboard_state::widgets::format_size;
use refboard_state::{AppContext, ConsoleError, ConsoleResult, Sources};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stats,
    ExportNotifications,
    Users,
}

impl Command {
    fn from_args() -> ConsoleResult<Self> {
        let mut args = std::env::args().skip(1);
        let mut command = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    args.next();
                }
                "stats" => command = Some(Command::Stats),
                "export-notifications" => command = Some(Command::ExportNotifications),
                "users" => command = Some(Command::Users),
                other => {
                    return Err(ConsoleError::Usage(format!(
                        "unknown argument '{other}'; expected stats, export-notifications or users"
                    )))
                }
            }
        }
        Ok(command.unwrap_or(Command::Stats))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("refboard=info,refboard_state=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats<T: FilterTab>(title: &str, stats: &CollectionStats<T>) {
    let breakdown: Vec<String> = stats
        .per_tab
        .iter()
        .map(|entry| format!("{} {}", entry.tab.label(), entry.count))
        .collect();
    println!("{title}: {} total ({})", stats.total, breakdown.join(", "));
}

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    init_tracing();
    let command = Command::from_args()?;
    let config = ConsoleConfig::load()?;
    let sources = Sources::mock(config.seed.delay());
    let mut app = AppContext::new(config, Handle::current())?;
    app.load(&sources).await?;

    match command {
        Command::Stats => {
            print_stats("Users", &app.users().stats());
            print_stats("Notifications", &app.notifications().stats());
            print_stats("Videos", &app.videos().stats());
            let stored: u64 = app
                .video_scope
                .store
                .list()
                .iter()
                .map(|video| video.size_bytes)
                .sum();
            println!("Video storage: {}", format_size(stored));
        }
        Command::ExportNotifications => {
            let csv = app.notifications().export_csv()?;
            print!("{csv}");
        }
        Command::Users => {
            let page = app.users().page();
            for user in &page.items {
                println!(
                    "{:>4}  {:<20} {:<32} {}",
                    user.id().get(),
                    user.name,
                    user.email,
                    user.status
                );
            }
            println!(
                "Page {} of {} ({} users)",
                page.current_page, page.total_pages, page.total_items
            );
        }
    }
    Ok(())
}
