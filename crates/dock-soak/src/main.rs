use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chat_dock::constants::{MAX_CONVERSATION_WINDOWS, MAX_VISIBLE_WINDOWS};
use chat_dock::runner::DockApp;
use chat_dock::ui::UiFrame;
use chat_dock::{
    ChatSession, ConversationId, DockConfig, DockSnapshot, Intent, StaticDirectory,
};
use clap::Parser;
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

#[derive(Parser, Debug)]
#[command(
    name = "dock-soak",
    version = env!("CARGO_PKG_VERSION"),
    about = "Throws random intents and pointer gestures at the chat dock and checks every snapshot"
)]
struct SoakCli {
    /// Number of intents to dispatch.
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 100_000)]
    iterations: u64,

    /// Size of the conversation pool ids are drawn from.
    #[arg(short = 'c', long, value_name = "COUNT", default_value_t = 14)]
    conversations: usize,

    /// Seed for the intent generator. Defaults to the clock.
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Render into an off-screen buffer every this many steps (0 disables).
    #[arg(long, value_name = "STEPS", default_value_t = 50)]
    render_every: u64,
}

struct SoakConfig {
    iterations: u64,
    conversations: usize,
    seed: u64,
    render_every: u64,
}

impl TryFrom<&SoakCli> for SoakConfig {
    type Error = String;

    fn try_from(cli: &SoakCli) -> Result<Self, Self::Error> {
        if !(1..=50_000_000).contains(&cli.iterations) {
            return Err("iterations must be between 1 and 50,000,000".to_string());
        }
        if !(1..=1_000).contains(&cli.conversations) {
            return Err("conversation pool must hold between 1 and 1000 ids".to_string());
        }
        Ok(Self {
            iterations: cli.iterations,
            conversations: cli.conversations,
            seed: cli.seed.unwrap_or_else(clock_seed),
            render_every: cli.render_every,
        })
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}

/// Linear congruential generator; reproducible for a given seed.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn below(&mut self, bound: usize) -> usize {
        self.next() as usize % bound.max(1)
    }
}

fn random_intent(rng: &mut Lcg, pool: &[ConversationId]) -> Intent {
    let id = pool[rng.below(pool.len())].clone();
    // weighted towards opening so the caps actually get hit
    match rng.below(20) {
        0 | 1 => Intent::OpenList,
        2 => Intent::CloseList,
        3..=8 => Intent::OpenConversation(id),
        9 | 10 => Intent::CloseConversation(id),
        11..=13 => Intent::MinimizeConversation(id),
        14..=16 => Intent::RestoreConversation(id),
        17 => Intent::ResetVisibleLimitWarning,
        18 => Intent::ResetTotalLimitWarning,
        _ if rng.below(8) == 0 => Intent::CloseAll,
        _ => Intent::OpenList,
    }
}

fn random_pointer(rng: &mut Lcg, area: Rect) -> Event {
    let kind = match rng.below(4) {
        0 => MouseEventKind::Down(MouseButton::Left),
        1 | 2 => MouseEventKind::Drag(MouseButton::Left),
        _ => MouseEventKind::Up(MouseButton::Left),
    };
    Event::Mouse(MouseEvent {
        kind,
        column: area.x + rng.below(area.width as usize) as u16,
        row: area.y + rng.below(area.height as usize) as u16,
        modifiers: KeyModifiers::NONE,
    })
}

#[derive(Default)]
struct SoakStats {
    steps: u64,
    changed: u64,
    visible_limit_hits: u64,
    total_limit_hits: u64,
    max_visible: usize,
    max_conversations: usize,
    renders: u64,
}

impl SoakStats {
    fn record(&mut self, before: &DockSnapshot, after: &DockSnapshot, changed: bool) {
        self.steps += 1;
        if changed {
            self.changed += 1;
        }
        if after.visible_limit_reached() && !before.visible_limit_reached() {
            self.visible_limit_hits += 1;
        }
        if after.total_limit_reached() && !before.total_limit_reached() {
            self.total_limit_hits += 1;
        }
        self.max_visible = self.max_visible.max(after.visible_count());
        self.max_conversations = self.max_conversations.max(after.conversation_count());
    }

    fn report(&self, config: &SoakConfig, elapsed: Duration) -> String {
        indoc::formatdoc!(
            r#"
            Dock soak finished {steps} steps in {elapsed:.2}s (seed {seed}).
            Changed snapshots: {changed} | Off-screen renders: {renders}
            Visible limit raised {visible_hits} times | Total limit raised {total_hits} times
            Peak visible: {max_visible}/{visible_cap} | Peak conversations: {max_conv}/{conv_cap}
            "#,
            steps = self.steps,
            elapsed = elapsed.as_secs_f64(),
            seed = config.seed,
            changed = self.changed,
            renders = self.renders,
            visible_hits = self.visible_limit_hits,
            total_hits = self.total_limit_hits,
            max_visible = self.max_visible,
            visible_cap = MAX_VISIBLE_WINDOWS,
            max_conv = self.max_conversations,
            conv_cap = MAX_CONVERSATION_WINDOWS,
        )
    }
}

fn directory(size: usize) -> (StaticDirectory, Vec<ConversationId>) {
    let mut directory = StaticDirectory::new();
    let mut pool = Vec::with_capacity(size);
    for n in 0..size {
        let id = ConversationId::new(format!("c{n:03}"));
        directory.insert(id.clone(), format!("Conversation {n}"), n % 4 == 3);
        pool.push(id);
    }
    // one id the directory does not know, to exercise title fallbacks
    pool.push(ConversationId::new("unlisted"));
    (directory, pool)
}

fn run(config: &SoakConfig) -> Result<SoakStats, String> {
    let (directory, pool) = directory(config.conversations);
    let session = ChatSession::sign_in("soak", DockConfig::default());
    let mut app = DockApp::new(session, directory);
    let mut rng = Lcg::new(config.seed);
    let mut stats = SoakStats::default();
    let area = Rect::new(0, 0, 120, 36);
    let mut buffer = Buffer::empty(area);
    let start = Instant::now();

    for step in 0..config.iterations {
        let before = app.session().dispatcher().snapshot();
        let intent = random_intent(&mut rng, &pool);
        let label = intent.to_string();
        let changed = app.session_mut().dispatcher_mut().dispatch(intent);
        let after = app.session().dispatcher().snapshot();

        after
            .check_invariants()
            .map_err(|violation| format!("step {step} ({label}): {violation}"))?;
        stats.record(&before, &after, changed);

        if config.render_every > 0 && step % config.render_every == 0 {
            app.handle_event(&random_pointer(&mut rng, area));
            app.tick(start + Duration::from_millis(step));
            buffer.reset();
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            app.render(&mut frame);
            stats.renders += 1;
            app.session()
                .dispatcher()
                .snapshot()
                .check_invariants()
                .map_err(|violation| format!("step {step} after render: {violation}"))?;
        }
    }

    let open = app.into_session().sign_out();
    if open > MAX_CONVERSATION_WINDOWS + 1 {
        return Err(format!("{open} windows open at sign-out"));
    }
    Ok(stats)
}

fn main() -> ExitCode {
    let cli = SoakCli::parse();
    let config = match SoakConfig::try_from(&cli) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let started = Instant::now();
    match run(&config) {
        Ok(stats) => {
            println!("{}", stats.report(&config, started.elapsed()));
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("invariant violated at {msg} (seed {})", config.seed);
            ExitCode::FAILURE
        }
    }
}
