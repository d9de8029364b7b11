use crate::core::command::{Command, CommandOutcome, CommandScript};
use crate::core::export::{Clock, ExportReceipt, Exporter};
use crate::core::{ExportFormat, Ledger, Storage};
use crate::utils::error::{Result, TastingError};

/// 一場品酒會：持有帳本並依序套用指令
pub struct TastingSession<S: Storage> {
    ledger: Option<Ledger>,
    exporter: Exporter<S>,
    exports: Vec<ExportReceipt>,
}

/// `apply_all` 中途失敗時，指出是第幾個指令
#[derive(Debug)]
pub struct CommandFailure {
    pub index: usize,
    pub command: Command,
    pub error: TastingError,
}

impl CommandFailure {
    /// 腳本失敗一律非零結束；低嚴重度也視為 1
    pub fn exit_code(&self) -> i32 {
        self.error.severity().exit_code().max(1)
    }
}

impl<S: Storage> TastingSession<S> {
    pub fn new(storage: S) -> Self {
        Self {
            ledger: None,
            exporter: Exporter::new(storage),
            exports: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.exporter = self.exporter.with_clock(clock);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn ledger(&self) -> Result<&Ledger> {
        self.ledger.as_ref().ok_or_else(not_initialized)
    }

    pub fn exports(&self) -> &[ExportReceipt] {
        &self.exports
    }

    pub fn storage(&self) -> &S {
        self.exporter.storage()
    }

    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        tracing::debug!("Applying command: {}", command.name());
        match command {
            Command::InitializeSession {
                sample_count,
                rater_names,
            } => {
                if self.ledger.is_some() {
                    return Err(TastingError::invalid_configuration(
                        "session",
                        "initialized",
                        "samples and raters are fixed once the session has started",
                    ));
                }
                let ledger = Ledger::initialize(sample_count, &rater_names)?;
                let outcome = CommandOutcome::Initialized {
                    samples: ledger.sample_count(),
                    raters: ledger.rater_count(),
                };
                tracing::info!(
                    "🍸 Session started with {} samples and {} raters",
                    ledger.sample_count(),
                    ledger.rater_count()
                );
                self.ledger = Some(ledger);
                Ok(outcome)
            }
            Command::SetScore {
                sample_id,
                rater,
                value,
            } => {
                self.ledger_mut()?.set_score(&sample_id, &rater, value)?;
                Ok(CommandOutcome::Updated)
            }
            Command::SetComment {
                sample_id,
                rater,
                text,
            } => {
                self.ledger_mut()?.set_comment(&sample_id, &rater, &text)?;
                Ok(CommandOutcome::Updated)
            }
            Command::RenameSample {
                sample_id,
                new_name,
            } => {
                self.ledger_mut()?.rename_sample(&sample_id, &new_name)?;
                Ok(CommandOutcome::Updated)
            }
            Command::Export { format } => {
                let receipt = self.export(format)?;
                Ok(CommandOutcome::Exported {
                    path: receipt.path,
                    rows: receipt.rows,
                })
            }
        }
    }

    /// 依序套用，遇到第一個錯誤就停止
    pub fn apply_all<I>(&mut self, commands: I) -> std::result::Result<Vec<CommandOutcome>, CommandFailure>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut outcomes = Vec::new();
        for (index, command) in commands.into_iter().enumerate() {
            match self.apply(command.clone()) {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    tracing::warn!("Command #{} ({}) failed: {}", index + 1, command.name(), error);
                    return Err(CommandFailure {
                        index,
                        command,
                        error,
                    });
                }
            }
        }
        Ok(outcomes)
    }

    pub fn export(&mut self, format: ExportFormat) -> Result<ExportReceipt> {
        let ledger = self.ledger.as_ref().ok_or_else(not_initialized)?;
        let receipt = self.exporter.export(ledger, format)?;
        self.exports.push(receipt.clone());
        Ok(receipt)
    }

    fn ledger_mut(&mut self) -> Result<&mut Ledger> {
        self.ledger.as_mut().ok_or_else(not_initialized)
    }
}

/// 乾跑用的儲存，寫入一律丟棄
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardStorage;

impl Storage for DiscardStorage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        tracing::debug!("Discarding {} bytes for {}", data.len(), path);
        Ok(())
    }
}

/// 套用腳本中匯出以外的指令來驗證腳本，不寫任何檔案
///
/// 失敗時 `CommandFailure::index` 指向原腳本中的位置。
pub fn dry_run(
    script: &CommandScript,
) -> std::result::Result<TastingSession<DiscardStorage>, CommandFailure> {
    let mut session = TastingSession::new(DiscardStorage);
    for (index, command) in script.commands.iter().enumerate() {
        if matches!(command, Command::Export { .. }) {
            continue;
        }
        if let Err(error) = session.apply(command.clone()) {
            tracing::warn!("Command #{} ({}) failed: {}", index + 1, command.name(), error);
            return Err(CommandFailure {
                index,
                command: command.clone(),
                error,
            });
        }
    }
    Ok(session)
}

fn not_initialized() -> TastingError {
    TastingError::invalid_configuration(
        "session",
        "uninitialized",
        "initialize the session with samples and raters first",
    )
}
