use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use catvatar::{
    AvatarConfig, AvatarController, CpuRenderer, CustomizationState, JsonFileStore, Millis,
    RenderSettings, RetainedScene, Rgb, SharedSurface, VirtualClock, compose,
};

#[derive(Parser, Debug)]
#[command(name = "catvatar", version)]
struct Cli {
    /// JSON store the customization is persisted in.
    #[arg(long, global = true, default_value = "catvatar-store.json")]
    store: PathBuf,

    /// Optional avatar config JSON (seed, store keys, animations, canvas).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the persisted customization as JSON.
    State,
    /// Change one part (or `accessory`) and persist it.
    Set(SetArgs),
    /// Print the composed part tree as JSON.
    Tree,
    /// Render the avatar to a PNG, optionally after running the animations for a while.
    Frame(FrameArgs),
    /// Run the animation chains on a virtual clock and report what fired.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SetArgs {
    /// Part name (`ears`, `body`, `belly`, `tailTip`, ...) or `accessory`.
    part: String,
    /// Color (`#rrggbb`, `0xrrggbb`, decimal) or pattern / accessory tag.
    value: String,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Virtual milliseconds of animation to run before capturing.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Background color; transparent when omitted.
    #[arg(long)]
    background: Option<String>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Virtual milliseconds to run.
    #[arg(long, default_value_t = 60_000)]
    ms: u64,

    /// Hide the avatar after this many milliseconds.
    #[arg(long)]
    hide_at_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AvatarConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => AvatarConfig::default(),
    };

    match &cli.cmd {
        Command::State => cmd_state(&cli, &config),
        Command::Set(args) => cmd_set(&cli, &config, args),
        Command::Tree => cmd_tree(&cli, &config),
        Command::Frame(args) => cmd_frame(&cli, &config, args),
        Command::Simulate(args) => cmd_simulate(&cli, &config, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(cli: &Cli) -> anyhow::Result<JsonFileStore> {
    JsonFileStore::open(&cli.store).with_context(|| format!("open store '{}'", cli.store.display()))
}

fn load_state(cli: &Cli, config: &AvatarConfig) -> anyhow::Result<CustomizationState> {
    let store = open_store(cli)?;
    Ok(CustomizationState::load_with_keys(
        &store,
        config.store_keys.clone(),
    ))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("encode JSON")?;
    println!("{text}");
    Ok(())
}

fn cmd_state(cli: &Cli, config: &AvatarConfig) -> anyhow::Result<()> {
    let state = load_state(cli, config)?;
    print_json(&serde_json::json!({
        "colors": state.colors(),
        "accessory": state.accessory().tag(),
    }))
}

fn cmd_set(cli: &Cli, config: &AvatarConfig, args: &SetArgs) -> anyhow::Result<()> {
    let mut store = open_store(cli)?;
    let mut state = CustomizationState::load_with_keys(&store, config.store_keys.clone());
    let accepted = if args.part.eq_ignore_ascii_case("accessory") {
        state.set_accessory_str(&mut store, &args.value)
    } else {
        state.set_part_str(&mut store, &args.part, &args.value)
    };
    if !accepted {
        anyhow::bail!("'{}' is not a valid value for '{}'", args.value, args.part);
    }
    eprintln!("set {} = {}", args.part, args.value);
    Ok(())
}

fn cmd_tree(cli: &Cli, config: &AvatarConfig) -> anyhow::Result<()> {
    let state = load_state(cli, config)?;
    print_json(&compose(state.colors(), state.accessory()))
}

/// A controller over a fresh in-memory scene and virtual clock.
struct Session {
    clock: Rc<VirtualClock>,
    scene: Rc<RefCell<RetainedScene>>,
    controller: AvatarController,
}

fn open_session(cli: &Cli, config: &AvatarConfig) -> anyhow::Result<Session> {
    let store = open_store(cli)?;
    let clock = Rc::new(VirtualClock::new());
    let scene = Rc::new(RefCell::new(RetainedScene::new(config.canvas.size())));
    let surface: SharedSurface = scene.clone();
    let controller = AvatarController::with_config(config, Box::new(store), surface, clock.clone());
    Ok(Session {
        clock,
        scene,
        controller,
    })
}

fn cmd_frame(cli: &Cli, config: &AvatarConfig, args: &FrameArgs) -> anyhow::Result<()> {
    let clear = args
        .background
        .as_deref()
        .map(Rgb::parse_hex)
        .transpose()
        .context("parse --background")?;

    let mut session = open_session(cli, config)?;
    session.controller.show();
    session.clock.advance_by(Millis(args.at_ms));

    let renderer = CpuRenderer::new(RenderSettings {
        clear,
        ..RenderSettings::default()
    });
    let frame = renderer
        .render(&session.scene.borrow())
        .context("render frame")?;
    frame
        .write_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_simulate(cli: &Cli, config: &AvatarConfig, args: &SimulateArgs) -> anyhow::Result<()> {
    let mut session = open_session(cli, config)?;
    session.controller.show();

    let hide_at = args.hide_at_ms.map_or(args.ms, |ms| ms.min(args.ms));
    session.clock.advance_to(Millis(hide_at));
    let fired_while_shown = session.clock.fired();
    if args.hide_at_ms.is_some() {
        session.controller.hide();
    }
    session.clock.advance_to(Millis(args.ms));

    print_json(&serde_json::json!({
        "ms": args.ms,
        "fired": session.clock.fired(),
        "fired_while_shown": fired_while_shown,
        "pending": session.clock.pending(),
        "visible": session.controller.is_shown(),
        "live_primitives": session.scene.borrow().live_count(),
    }))
}
