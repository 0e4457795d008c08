use anyhow::{Context, Result};
use clap::Parser;

use activity_digest::cancel::{self, CancellationToken};
use activity_digest::cli::{normalize, Cli, Mode};
use activity_digest::host::gitlab_api::GitlabHttpApi;
use activity_digest::notify::SlackNotifier;
use activity_digest::summarize::{HttpSummarizer, Summarizer};
use activity_digest::{report, util, window};

fn main() -> Result<()> {
  util::init_logging();
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;
  let settings = &cfg.settings;

  // Phase 2: resolve the window
  let now = window::effective_now(cfg.now_override);
  let window = window::resolve(cfg.date.as_deref(), now)?;
  tracing::info!(since = %window.since_param(), until = %window.until_param(), mode = ?cfg.mode, "resolved window");

  // Phase 3: collect
  let api = GitlabHttpApi::new(&settings.host, settings.http_timeout);
  let cancel = CancellationToken::new();
  cancel::cancel_on_ctrlc(cancel.clone());
  let mut run = report::run_activity(&api, settings, window, &cancel)?;

  // Phase 4: emit
  match cfg.mode {
    Mode::Debug => {
      let report = report::debug_report(&run, &settings.identity);
      println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Mode::Preview | Mode::Notify => {
      let summarizer = settings
        .summarizer
        .as_ref()
        .map(|s| HttpSummarizer::new(s, settings.http_timeout));
      let composed = report::compose_message(&mut run, summarizer.as_ref().map(|s| s as &dyn Summarizer));

      if cfg.mode == Mode::Preview {
        println!("{}", composed.text);
      } else {
        let chat = settings.chat.as_ref().context("chat settings missing for notify mode")?;
        let notifier = SlackNotifier::new(chat, settings.http_timeout);
        report::deliver(&notifier, &composed)?;
        println!("delivered to {}", chat.channel);
      }
    }
  }

  if !run.errors.is_empty() {
    tracing::warn!(count = run.errors.len(), "run completed with partial data");
  }
  Ok(())
}
