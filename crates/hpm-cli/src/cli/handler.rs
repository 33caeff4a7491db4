use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use hpm_core::derive::{active_rules, category_breakdown, LoginStreakOutcome};
use hpm_core::models::{GameFaceSource, NewAntEvent, NewGameFace, PolicyFields, TechniquesUsed};
use hpm_core::roulette::{self, DEFAULT_PERIOD};
use hpm_core::Tracker;
use tracing::debug;

use super::command::CliCommand;

/// Report the session-start check-in. Silent unless something changed.
pub fn report_check_in(outcome: &LoginStreakOutcome, out: &mut dyn Write) -> Result<()> {
    if let Some(reward) = &outcome.reward_unlocked {
        writeln!(
            out,
            "Streak reward unlocked: {} ({} days, +{} XP). Claim it with `hpm claim {}`.",
            reward.title, reward.days, reward.bonus, reward.days
        )?;
    }
    Ok(())
}

pub fn execute(tracker: &mut Tracker, command: CliCommand, out: &mut dyn Write) -> Result<()> {
    debug!("cli: executing {:?}", command);
    match command {
        CliCommand::Status => status(tracker, out),

        CliCommand::Log {
            category,
            intensity,
            attempted,
            notes,
            context,
            self_talk,
            body,
            game_face_id,
        } => {
            if tracker.catalog().thought_category(&category).is_none() {
                bail!("Unknown thought category: {}", category);
            }
            if let Some(id) = &game_face_id {
                if tracker.game_face(id).is_none() {
                    bail!("Unknown game face: {}", id);
                }
            }
            let input = NewAntEvent {
                category,
                intensity,
                attempted,
                notes,
                context,
                techniques_used: TechniquesUsed::new(self_talk, body),
                game_face_id,
            };
            let event = tracker.append_event(input)?;
            let verdict = if event.resolved { "squashed" } else { "logged" };
            writeln!(out, "{} {} (intensity {})", verdict, event.category, event.intensity)?;
            writeln!(out, "XP: {}", tracker.xp())?;
            Ok(())
        }

        CliCommand::Risk { scenario_id } => {
            let Some(scenario) = tracker.catalog().risk_scenario(&scenario_id) else {
                bail!("Unknown risk scenario: {}", scenario_id);
            };
            let line = format!("Risk taken: {} (+{} XP)", scenario.name, scenario.xp);
            tracker.append_risk_event(&scenario_id);
            writeln!(out, "{}", line)?;
            writeln!(out, "XP: {}", tracker.xp())?;
            Ok(())
        }

        CliCommand::CreateGameFace {
            name,
            power_words,
            model_person,
            source,
        } => {
            let source: GameFaceSource = source.parse().map_err(anyhow::Error::msg)?;
            let face = tracker.create_game_face(NewGameFace {
                name,
                power_words,
                model_person,
                source,
            })?;
            writeln!(out, "Created game face {}: {}", face.id, face.summary())?;
            Ok(())
        }

        CliCommand::ListGameFaces => {
            let faces = &tracker.state().game_faces;
            if faces.is_empty() {
                writeln!(out, "No game faces yet.")?;
            }
            for face in faces {
                writeln!(out, "{}  {}", face.id, face.summary())?;
            }
            Ok(())
        }

        CliCommand::Claim { days } => {
            let reward = tracker.claim_streak_reward(days)?;
            writeln!(out, "Claimed {} (+{} XP)", reward.title, reward.bonus)?;
            writeln!(out, "XP: {}", tracker.xp())?;
            Ok(())
        }

        CliCommand::ToggleRule { rule_id } => {
            let Some(rule) = tracker.catalog().rule(&rule_id) else {
                bail!("Unknown rule: {}", rule_id);
            };
            let statement = rule.statement.clone();
            let active = tracker.toggle_rule(&rule_id);
            let state = if active { "on" } else { "off" };
            writeln!(out, "[{}] {}", state, statement)?;
            Ok(())
        }

        CliCommand::ListRules => {
            for rule in &tracker.catalog().rules {
                let mark = if tracker.state().is_rule_active(&rule.id) { "x" } else { " " };
                writeln!(out, "[{}] {}  {}", mark, rule.id, rule.statement)?;
            }
            Ok(())
        }

        CliCommand::Exposure { exposure_id, date } => {
            let Some(exposure) = tracker.catalog().exposure(&exposure_id) else {
                bail!("Unknown exposure: {}", exposure_id);
            };
            let description = exposure.description.clone();
            let date = date.unwrap_or_else(|| tracker.today());
            tracker.log_exposure(&exposure_id, date);
            writeln!(out, "{}: {}", date, description)?;
            Ok(())
        }

        CliCommand::Metric {
            metric_id,
            score,
            date,
        } => {
            let Some(metric) = tracker.catalog().metric(&metric_id) else {
                bail!("Unknown metric: {}", metric_id);
            };
            let name = metric.name.clone();
            let date = date.unwrap_or_else(|| tracker.today());
            tracker.log_metric(&metric_id, date, score)?;
            writeln!(out, "{}: {} = {}", date, name, score)?;
            Ok(())
        }

        CliCommand::Positive { text, date } => {
            let date = date.unwrap_or_else(|| tracker.today());
            tracker.save_positive_of_day(date, &text)?;
            writeln!(out, "Saved positive for {}", date)?;
            Ok(())
        }

        CliCommand::Worry { text } => {
            tracker.log_worry(&text)?;
            writeln!(
                out,
                "Worry parked ({} waiting)",
                tracker.state().worry_entries.len()
            )?;
            Ok(())
        }

        CliCommand::Policy {
            will_do,
            wont_do,
            exit_date,
            notice_date,
            script_id,
        } => {
            if let Some(id) = &script_id {
                if tracker.catalog().script(id).is_none() {
                    bail!("Unknown script: {}", id);
                }
            }
            let policy = tracker.generate_policy(
                PolicyFields {
                    will_do,
                    wont_do,
                    exit_date,
                    notice_date,
                },
                script_id,
            );
            writeln!(out, "I will: {}", policy.will_do)?;
            writeln!(out, "I won't: {}", policy.wont_do)?;
            writeln!(out, "Exit date: {}", policy.exit_date)?;
            writeln!(out, "Notice date: {}", policy.notice_date)?;
            if let Some(script) = policy
                .chosen_script_id
                .as_deref()
                .and_then(|id| tracker.catalog().script(id))
            {
                writeln!(out, "Script: {}", script.text)?;
            }
            Ok(())
        }

        CliCommand::Script { script_id } => {
            let Some(script) = tracker.catalog().script(&script_id) else {
                bail!("Unknown script: {}", script_id);
            };
            writeln!(out, "{} / {}", script.audience, script.trigger)?;
            writeln!(out, "{}", script.text)?;
            Ok(())
        }

        CliCommand::DarkMode { enabled } => {
            let enabled = match enabled {
                Some(enabled) => {
                    tracker.set_dark_mode(enabled);
                    enabled
                }
                None => tracker.toggle_dark_mode(),
            };
            writeln!(out, "Dark mode {}", if enabled { "on" } else { "off" })?;
            Ok(())
        }

        CliCommand::Spin { ticks } => spin(tracker, ticks, DEFAULT_PERIOD, out),

        CliCommand::Dump { pretty } => {
            let json = if pretty {
                serde_json::to_string_pretty(tracker.state())?
            } else {
                serde_json::to_string(tracker.state())?
            };
            writeln!(out, "{}", json)?;
            Ok(())
        }
    }
}

fn status(tracker: &Tracker, out: &mut dyn Write) -> Result<()> {
    let dashboard = tracker.dashboard();
    let rank = &dashboard.rank;

    writeln!(out, "Rank: {} (level {})", rank.current.name, rank.current.level)?;
    match rank.next {
        Some(next) => writeln!(
            out,
            "XP: {} ({} to {}, {:.0}%)",
            dashboard.xp, rank.xp_to_next, next.name, rank.progress_percent
        )?,
        None => writeln!(out, "XP: {} (top rank)", dashboard.xp)?,
    }
    writeln!(out, "Performance streak: {} days", dashboard.performance_streak)?;
    writeln!(out, "Login streak: {} days", dashboard.login_streak)?;
    if let Some(reward) = dashboard.next_reward {
        writeln!(out, "Next reward: {} at {} days", reward.title, reward.days)?;
    }
    writeln!(out, "Mindset: {}/10", dashboard.mindset_level)?;
    writeln!(
        out,
        "Today: {}/{} ANTs attempted, {} exposures, {} metrics scored",
        dashboard.today.attempted,
        dashboard.today.total,
        dashboard.exposures_today.len(),
        dashboard.metrics_today.len()
    )?;

    let breakdown = category_breakdown(&tracker.state().events, tracker.catalog());
    if !breakdown.is_empty() {
        writeln!(out, "By category:")?;
        for stats in breakdown {
            writeln!(
                out,
                "  {}: {}/{} ({:.0}%)",
                stats.category, stats.attempted, stats.total, stats.win_rate_percent
            )?;
        }
    }

    let rules = active_rules(tracker.state(), tracker.catalog());
    if !rules.is_empty() {
        writeln!(out, "Active rules:")?;
        for rule in rules {
            writeln!(out, "  {}", rule.statement)?;
        }
    }
    Ok(())
}

fn spin(tracker: &Tracker, ticks: u32, period: Duration, out: &mut dyn Write) -> Result<()> {
    let words = tracker.catalog().all_power_words();
    if words.is_empty() {
        bail!("The catalog has no power words");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    let (picks, word) = runtime.block_on(async move {
        let spin = roulette::spin(words, ticks, period);
        let mut updates = spin.subscribe();
        let mut picks = Vec::new();
        while updates.changed().await.is_ok() {
            if let Some(word) = updates.borrow_and_update().clone() {
                picks.push(word);
            }
        }
        (picks, spin.finish().await)
    });

    let shown = picks.len().saturating_sub(1);
    for pick in &picks[..shown] {
        writeln!(out, "  {}", pick)?;
    }
    match word {
        Some(word) => writeln!(out, "Power word: {}", word)?,
        None => bail!("Spin stopped before settling"),
    }
    Ok(())
}
