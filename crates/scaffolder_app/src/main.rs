mod app;
mod effects;
mod logging;
mod persistence;
mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use scaffold_logging::scaffold_warn;
use scaffolder_core::{AppState, Msg, WizardStep};
use scaffolder_engine::{EngineConfig, EngineHandle, PollerSettings};
use url::Url;

use app::AppDriver;
use effects::EffectRunner;
use settings::ScaffoldJob;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);

    let settings = settings::load_settings(Path::new(settings::SETTINGS_FILENAME));
    let session_path = PathBuf::from(persistence::SESSION_FILENAME);
    let initial_user = persistence::load_cached_user(&session_path);
    let has_session = initial_user.is_some();

    let engine = EngineHandle::new(EngineConfig {
        platform_base_url: Url::parse(&settings.platform_base_url)?,
        code_host_base_url: Url::parse(&settings.code_host_base_url)?,
        poller: PollerSettings {
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_attempts: settings.max_poll_attempts,
        },
        identity: Arc::new(persistence::StoredSessionPrompt::new(session_path)),
        payment: Arc::new(persistence::UnattendedPaymentPrompt),
        initial_user,
    })?;
    let mut driver = AppDriver::new(EffectRunner::new(engine));

    driver.dispatch(Msg::FeedsRequested {
        include_authenticated: has_session,
    });
    if let Some(query) = settings.search_query.clone() {
        driver.dispatch(Msg::SearchSubmitted { query });
    }
    if !driver.pump_until_idle(Duration::from_secs(60)) {
        scaffold_warn!("Some feed fetches did not finish in time; showing what arrived");
    }
    print_templates(driver.state());

    if let Some(job) = settings.scaffold {
        run_scaffold(&mut driver, job)?;
    }
    Ok(())
}

fn print_templates(state: &AppState) {
    let view = state.view();
    println!("{} templates:", view.templates.len());
    for card in &view.templates {
        let mut flags = Vec::new();
        if card.is_sponsored {
            flags.push("sponsored");
        }
        if card.is_popular {
            flags.push("popular");
        }
        if card.is_favorite {
            flags.push("favorite");
        }
        if card.is_my_sponsored {
            flags.push("mine");
        }
        println!(
            "  {}/{} [{}] favorites={} {}",
            card.owner,
            card.name,
            flags.join(" "),
            card.favorite_count,
            card.code_host_link
        );
    }
    for notice in &view.notices {
        println!("  note: {notice}");
    }
}

fn run_scaffold(driver: &mut AppDriver, job: ScaffoldJob) -> anyhow::Result<()> {
    driver.dispatch(Msg::ScaffoldStarted {
        template_owner: job.template_owner,
        template_name: job.template_name,
        current_year: Utc::now().year(),
    });
    driver.dispatch(Msg::NameSubmitted(job.destination_name));
    if !driver.pump_until_idle(Duration::from_secs(300)) {
        anyhow::bail!("replacement discovery did not finish in time");
    }

    let view = driver.state().view();
    let wizard = view
        .wizard
        .ok_or_else(|| anyhow::anyhow!("wizard is no longer active"))?;
    if wizard.step == WizardStep::Error {
        anyhow::bail!(
            "scaffolding failed: {}",
            wizard.error_message.unwrap_or_default()
        );
    }
    for (index, entry) in wizard.replacements.iter().enumerate() {
        if let Some((_, value)) = job.replacements.iter().find(|(key, _)| key == &entry.key) {
            driver.dispatch(Msg::ReplacementEdited {
                index,
                value: value.clone(),
            });
        }
    }

    driver.dispatch(Msg::CreateClicked);
    if !driver.pump_until_idle(Duration::from_secs(600)) {
        anyhow::bail!("repository creation did not finish in time");
    }

    let view = driver.state().view();
    let wizard = view
        .wizard
        .ok_or_else(|| anyhow::anyhow!("wizard is no longer active"))?;
    match wizard.step {
        WizardStep::Complete => {
            println!("created {}", wizard.destination_url.unwrap_or_default());
            Ok(())
        }
        _ => anyhow::bail!(
            "scaffolding failed: {}",
            wizard
                .error_message
                .unwrap_or_else(|| "did not reach completion".to_string())
        ),
    }
}
