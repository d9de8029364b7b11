use crate::core::command::{Command, CommandOutcome};
use crate::core::report::{bar_chart, podium, ranking_report};
use crate::core::session::TastingSession;
use crate::core::{ConfigProvider, ExportFormat, Storage};
use crate::domain::catalog::KnownSamples;
use crate::domain::model::{MAX_RATERS, MAX_SAMPLES, MIN_RATERS, MIN_SAMPLES};
use crate::utils::error::TastingError;
use anyhow::Result;
use dialoguer::{Input, Select};

pub const CUSTOM_NAME: &str = "Custom name...";

const MENU: [&str; 7] = [
    "Enter scores",
    "Add comments",
    "Resolve sample names",
    "Show results",
    "Show charts",
    "Save",
    "Quit",
];

/// 互動式前端：讀取使用者輸入並轉成指令送進品酒會
pub struct PromptFrontend<S: Storage> {
    session: TastingSession<S>,
    catalog: KnownSamples,
    default_format: ExportFormat,
    chart_width: usize,
    podium_places: usize,
}

impl<S: Storage> PromptFrontend<S> {
    pub fn new<C: ConfigProvider>(session: TastingSession<S>, catalog: KnownSamples, config: &C) -> Self {
        Self {
            session,
            catalog,
            default_format: config.default_format(),
            chart_width: config.chart_width(),
            podium_places: config.podium_places(),
        }
    }

    pub fn session(&self) -> &TastingSession<S> {
        &self.session
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_session()?;

        loop {
            let choice = Select::new()
                .with_prompt("What next?")
                .items(&MENU)
                .default(0)
                .interact()?;

            match choice {
                0 => self.enter_scores()?,
                1 => self.add_comments()?,
                2 => self.resolve_names()?,
                3 => println!("{}", ranking_report(self.session.ledger()?)),
                4 => self.show_charts()?,
                5 => self.save()?,
                _ => break,
            }
        }

        tracing::info!("👋 Tasting session closed");
        Ok(())
    }

    fn start_session(&mut self) -> Result<()> {
        loop {
            let sample_count: usize = Input::new()
                .with_prompt(format!("Number of gins to taste ({}-{})", MIN_SAMPLES, MAX_SAMPLES))
                .interact_text()?;
            let rater_count: usize = Input::new()
                .with_prompt(format!("Number of raters ({}-{})", MIN_RATERS, MAX_RATERS))
                .interact_text()?;

            // 人數超出範圍時不必先問名字
            if !(MIN_RATERS..=MAX_RATERS).contains(&rater_count) {
                warn_user(&TastingError::invalid_configuration(
                    "rater_count",
                    rater_count,
                    format!("Value must be between {} and {}", MIN_RATERS, MAX_RATERS),
                ));
                continue;
            }

            let mut rater_names = Vec::with_capacity(rater_count);
            for i in 0..rater_count {
                let name: String = Input::new()
                    .with_prompt(format!("Name of rater {}", i + 1))
                    .interact_text()?;
                rater_names.push(name.trim().to_string());
            }

            match self.session.apply(Command::InitializeSession {
                sample_count,
                rater_names,
            }) {
                Ok(CommandOutcome::Initialized { samples, raters }) => {
                    println!("Scoring grid ready: {} gins × {} raters, all scores start at 5", samples, raters);
                    return Ok(());
                }
                Ok(_) => return Ok(()),
                Err(e) => warn_user(&e),
            }
        }
    }

    fn enter_scores(&mut self) -> Result<()> {
        for (sample_id, rater) in self.pairs()? {
            loop {
                let current = self.session.ledger()?.score(&sample_id, &rater)?;
                let label = self.label(&sample_id)?;
                let value: i64 = Input::new()
                    .with_prompt(format!("Score from {} for {} (1-10)", rater, label))
                    .default(i64::from(current.value()))
                    .interact_text()?;

                match self.session.apply(Command::SetScore {
                    sample_id: sample_id.clone(),
                    rater: rater.clone(),
                    value,
                }) {
                    Ok(_) => break,
                    Err(e) => warn_user(&e),
                }
            }
        }
        Ok(())
    }

    fn add_comments(&mut self) -> Result<()> {
        for (sample_id, rater) in self.pairs()? {
            let label = self.label(&sample_id)?;
            let text: String = Input::new()
                .with_prompt(format!("Comment from {} for {}", rater, label))
                .allow_empty(true)
                .interact_text()?;

            // 空白輸入保留原本的評語
            if text.is_empty() {
                continue;
            }
            self.session.apply(Command::SetComment {
                sample_id,
                rater,
                text,
            })?;
        }
        Ok(())
    }

    fn resolve_names(&mut self) -> Result<()> {
        let sample_ids: Vec<String> = self
            .session
            .ledger()?
            .samples()
            .iter()
            .map(|s| s.id.clone())
            .collect();

        for sample_id in sample_ids {
            let current = self.label(&sample_id)?;
            let choices = name_choices(&self.catalog, &current);
            let picked = Select::new()
                .with_prompt(format!("Choose or enter a name for {}", sample_id))
                .items(&choices)
                .default(0)
                .interact()?;

            let new_name = if choices[picked] == CUSTOM_NAME {
                loop {
                    let name: String = Input::new()
                        .with_prompt("Enter the custom name")
                        .interact_text()?;
                    if !name.trim().is_empty() {
                        break name.trim().to_string();
                    }
                }
            } else {
                choices[picked].clone()
            };

            if new_name != current {
                self.session.apply(Command::RenameSample {
                    sample_id,
                    new_name,
                })?;
            }
        }
        Ok(())
    }

    fn show_charts(&self) -> Result<()> {
        let ledger = self.session.ledger()?;
        println!("{}", bar_chart(ledger, self.chart_width));
        println!();
        println!("{}", podium(ledger, self.podium_places));
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let raw: String = Input::new()
            .with_prompt("Choose Excel or CSV")
            .default(self.default_format.label().to_string())
            .interact_text()?;

        let format = match raw.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(e) => {
                warn_user(&e);
                return Ok(());
            }
        };

        match self.session.apply(Command::Export { format }) {
            Ok(CommandOutcome::Exported { path, rows }) => {
                println!("Saved {} rows as {}: {}", rows, format, path);
            }
            Ok(_) => {}
            Err(e) => warn_user(&e),
        }
        Ok(())
    }

    fn pairs(&self) -> Result<Vec<(String, String)>> {
        let ledger = self.session.ledger()?;
        Ok(ledger
            .samples()
            .iter()
            .flat_map(|sample| {
                ledger
                    .raters()
                    .iter()
                    .map(move |rater| (sample.id.clone(), rater.clone()))
            })
            .collect())
    }

    fn label(&self, sample_id: &str) -> Result<String> {
        Ok(self.session.ledger()?.display_name(sample_id)?.to_string())
    }
}

/// 重新命名時的選項：目前名稱、已知名稱、自訂
pub fn name_choices(catalog: &KnownSamples, current: &str) -> Vec<String> {
    let mut choices = vec![current.to_string()];
    choices.extend(
        catalog
            .names()
            .iter()
            .filter(|name| name.as_str() != current)
            .cloned(),
    );
    choices.push(CUSTOM_NAME.to_string());
    choices
}

fn warn_user(error: &TastingError) {
    tracing::warn!("{} ({:?})", error, error.category());
    eprintln!("⚠️  {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
}
