use std::path::{Path, PathBuf};

use anyhow::Context;
use bloodnet_core::donors::sample_roster;
use bloodnet_core::time::relative_label;
use bloodnet_core::{
    assistant, BloodNetConfig, BloodTypeFilter, ChatAction, ChatPanel, ChatSender, Dashboard,
    DashboardAction, DirectoryAction, DonorDirectory, Inventory, Simulation,
};
use chrono::Utc;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bloodnet-cli",
    about = "Chạy thử các widget BloodNet trong terminal với thời gian ảo."
)]
struct Args {
    /// File JSON cấu hình (các trường thiếu dùng mặc định).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hỏi trợ lý một câu và in câu trả lời.
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Mô phỏng N chu kỳ làm mới tồn kho.
    Stock {
        #[arg(long, default_value_t = 3)]
        ticks: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Snapshot `{"inventory": [...]}` dùng làm số liệu ban đầu.
        #[arg(long)]
        feed: Option<PathBuf>,
        /// Sự kiện thay đổi tồn kho áp dụng sau mô phỏng.
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Gửi lần lượt các tin nhắn và chờ người hiến trả lời.
    Chat {
        #[arg(required = true)]
        messages: Vec<String>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Lọc danh bạ người hiến.
    Donors {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        blood_type: String,
        /// Danh bạ `{"donors": [...]}`; mặc định dùng danh sách mẫu.
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Ask { text } => ask(&text.join(" ")),
        Command::Stock {
            ticks,
            seed,
            feed,
            events,
        } => stock(&config, ticks, seed, feed.as_deref(), events.as_deref()),
        Command::Chat { messages, seed } => chat(&config, &messages, seed),
        Command::Donors {
            query,
            blood_type,
            roster,
        } => donors(&config, &query, &blood_type, roster.as_deref()),
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {path:?}"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BloodNetConfig> {
    let Some(path) = path else {
        return Ok(BloodNetConfig::default());
    };
    let data = read_file(path)?;
    serde_json::from_str(&data).with_context(|| format!("Cấu hình không hợp lệ: {path:?}"))
}

fn ask(text: &str) -> anyhow::Result<()> {
    let resolution = assistant::resolve(text);
    println!("{}", resolution.entry.response);
    println!();
    println!("Suggestions: {}", resolution.entry.suggestions.join(" | "));
    tracing::debug!(kind = ?resolution.kind, keyword = resolution.entry.keyword, "ask");
    Ok(())
}

fn stock(
    config: &BloodNetConfig,
    ticks: u32,
    seed: u64,
    feed: Option<&Path>,
    events: Option<&Path>,
) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::with_seed(config, seed);
    if let Some(path) = feed {
        let inventory = bloodnet_feed::load_inventory_str(&read_file(path)?, config)
            .with_context(|| format!("Feed tồn kho không hợp lệ: {path:?}"))?;
        dashboard = dashboard.with_inventory(inventory);
    }

    let mut sim = Simulation::new(dashboard, Utc::now());
    print_inventory("start", sim.widget().inventory());

    sim.dispatch(DashboardAction::Start);
    for tick in 1..=ticks {
        sim.advance(config.stock_refresh());
        print_inventory(&format!("tick {tick}"), sim.widget().inventory());
    }

    if let Some(path) = events {
        let changes = bloodnet_feed::parse_stock_events_str(&read_file(path)?)
            .with_context(|| format!("Sự kiện tồn kho không hợp lệ: {path:?}"))?;
        for change in changes {
            sim.dispatch(DashboardAction::StockChanged(change));
        }
        print_inventory("events", sim.widget().inventory());
    }

    Ok(())
}

fn print_inventory(label: &str, inventory: &Inventory) {
    let row = inventory
        .entries()
        .map(|entry| {
            let flag = if entry.urgent { "!" } else { "" };
            format!("{}={}{flag}", entry.blood_type, entry.count)
        })
        .collect::<Vec<_>>()
        .join("  ");
    println!("{label:>8}: {row}");
}

fn chat(config: &BloodNetConfig, messages: &[String], seed: u64) -> anyhow::Result<()> {
    let start = Utc::now();
    let mut sim = Simulation::new(ChatPanel::with_seed(config, start, seed), start);
    sim.dispatch(ChatAction::Open { donor_id: None });

    for message in messages {
        sim.dispatch(ChatAction::Input(message.clone()));
        sim.dispatch(ChatAction::Send);
        sim.advance(config.donor_reply_delay().max(config.typing_indicator()));
    }

    let now = sim.now();
    for message in sim.widget().messages() {
        let sender = match message.sender {
            ChatSender::User => "You",
            ChatSender::Donor => "Donor",
        };
        println!(
            "[{}] {sender}: {}",
            relative_label(message.timestamp, now),
            message.text
        );
    }

    Ok(())
}

fn donors(
    config: &BloodNetConfig,
    query: &str,
    blood_type: &str,
    roster: Option<&Path>,
) -> anyhow::Result<()> {
    let filter: BloodTypeFilter = blood_type
        .parse()
        .with_context(|| format!("Nhóm máu không hợp lệ: {blood_type}"))?;
    let roster = match roster {
        Some(path) => bloodnet_feed::load_donors_str(&read_file(path)?)
            .with_context(|| format!("Danh bạ không hợp lệ: {path:?}"))?,
        None => sample_roster(),
    };

    let mut sim = Simulation::new(DonorDirectory::new(config, roster), Utc::now());
    sim.dispatch(DirectoryAction::Filter(filter));
    sim.dispatch(DirectoryAction::Search(query.to_string()));
    sim.advance(config.search_debounce());

    let visible = sim.widget().visible();
    if visible.is_empty() {
        println!("No donors match your search.");
    }
    for donor in visible {
        println!("{:<8} {:<16} {:<4} {}", donor.id, donor.name, donor.blood_type.label(), donor.location);
    }

    Ok(())
}
