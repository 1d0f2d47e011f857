// Copyright © 2025 Denis Morel
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License and
// a copy of the GNU General Public License along with this program. If not, see
// <https://www.gnu.org/licenses/>.

//! The cycle loop: sync the board, snapshot its key-set, evaluate
//! the dispatch rules, run whatever they select, aggregate any errors into
//! `ERROR(self)`, sleep, repeat.

use crate::actions::{
    add_decryption::add_decryption, add_mix::add_mix, add_or_sign_plaintexts::add_or_sign_plaintexts,
    add_or_sign_public_key::add_or_sign_public_key, add_pre_shuffle_data::add_pre_shuffle_data,
    add_share::add_share, validate_config::validate_config, verify_mix::verify_mix, ActionContext, ActionOutcome,
};
use crate::artifacts::config::Config;
use crate::board::Board;
use crate::ids::TrusteeId;
use crate::keystore::Keystore;
use crate::names::Name;
use crate::rules::{global_dispatch, item_dispatch, GlobalDispatch, ItemAction};
use rayon::prelude::*;
use std::time::Duration;

/// Everything one driver cycle needs beyond the board/keystore: this trustee's
/// identity and the per-process options that shape dispatch (`offlineSplit`) and
/// pacing.
pub struct Driver<'a> {
    pub board: &'a dyn Board,
    pub keystore: &'a Keystore,
    pub self_id: TrusteeId,
    pub offline_split: bool,
    pub cycle_sleep: Duration,
}

/// Outcome of one cycle, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub stopped: Option<String>,
    pub validated_config: bool,
    pub ran: Vec<(usize, String)>,
    pub errors: Vec<String>,
}

impl<'a> Driver<'a> {
    pub fn new(board: &'a dyn Board, keystore: &'a Keystore, self_id: TrusteeId, offline_split: bool) -> Self {
        Self {
            board,
            keystore,
            self_id,
            offline_split,
            cycle_sleep: Duration::from_secs(crate::consts::DEFAULT_CYCLE_SLEEP_SECONDS),
        }
    }

    /// Run forever, sleeping `cycle_sleep` between cycles. Returns only
    /// if a cycle's `Stop` outcome is fatal to the caller — in practice `trustee-loop`
    /// just logs `Stop` summaries and keeps looping, since a human clearing PAUSE or
    /// ERROR is the only way out.
    pub fn run_forever(&self) -> ! {
        loop {
            let summary = self.run_cycle();
            log_summary(&summary);
            std::thread::sleep(self.cycle_sleep);
        }
    }

    /// Run a single cycle once: sync, snapshot, dispatch, aggregate errors.
    pub fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();
        if let Err(e) = self.board.sync() {
            summary.errors.push(format!("board sync failed: {e}"));
            self.post_errors(&summary.errors);
            return summary;
        }

        let observed = match self.board.file_set() {
            Ok(set) => set,
            Err(e) => {
                summary.errors.push(format!("could not read board key-set: {e}"));
                self.post_errors(&summary.errors);
                return summary;
            }
        };

        match global_dispatch(&observed, self.self_id) {
            Some(GlobalDispatch::Stop(msg)) => {
                summary.stopped = Some(msg);
                return summary;
            }
            Some(GlobalDispatch::ValidateConfig) => {
                let ctx = self.context();
                match validate_config(&ctx) {
                    Ok(ActionOutcome::Ok) => summary.validated_config = true,
                    Ok(ActionOutcome::Stop(msg)) => summary.stopped = Some(msg),
                    Ok(ActionOutcome::Error(msg)) => summary.errors.push(msg),
                    Err(e) => summary.errors.push(e.message()),
                }
                self.post_errors(&summary.errors);
                return summary;
            }
            None => {}
        }

        let config: Config = match self.load_config() {
            Some(c) => c,
            None => return summary,
        };

        let mut selected = Vec::new();
        for item in 1..=config.item_count {
            if let Some(action) = item_dispatch(&observed, &config, self.offline_split, self.self_id, item) {
                selected.push((item, action));
            }
        }

        // Intra-cycle parallelism only when every selected action this cycle is
        // AddPreShuffleData (the only phase dense enough for it to pay off).
        let all_preshuffle = !selected.is_empty()
            && selected.iter().all(|(_, a)| matches!(a, ItemAction::AddPreShuffleData));

        let results: Vec<(usize, String, Result<ActionOutcome, crate::actions::ActionError>)> = if all_preshuffle {
            selected
                .par_iter()
                .map(|(item, action)| {
                    let ctx = self.context();
                    (*item, action_label(action), self.run_action(&ctx, *item, *action))
                })
                .collect()
        } else {
            selected
                .iter()
                .map(|(item, action)| {
                    let ctx = self.context();
                    (*item, action_label(action), self.run_action(&ctx, *item, *action))
                })
                .collect()
        };

        for (item, label, result) in results {
            match result {
                Ok(ActionOutcome::Ok) => summary.ran.push((item, label)),
                Ok(ActionOutcome::Stop(msg)) => {
                    summary.stopped.get_or_insert(msg);
                }
                Ok(ActionOutcome::Error(msg)) => {
                    summary.errors.push(format!("item {item} {label}: {msg}"))
                }
                Err(e) => summary.errors.push(format!("item {item} {label}: {}", e.message())),
            };
        }

        self.post_errors(&summary.errors);
        summary
    }

    fn context(&self) -> ActionContext<'a> {
        ActionContext {
            board: self.board,
            keystore: self.keystore,
            self_id: self.self_id,
        }
    }

    fn run_action(
        &self,
        ctx: &ActionContext,
        item: usize,
        action: ItemAction,
    ) -> Result<ActionOutcome, crate::actions::ActionError> {
        match action {
            ItemAction::AddShare => add_share(ctx, item),
            ItemAction::AddOrSignPublicKey => add_or_sign_public_key(ctx, item),
            ItemAction::AddPreShuffleData => add_pre_shuffle_data(ctx, item),
            ItemAction::AddMix => add_mix(ctx, item),
            ItemAction::VerifyMix(mixer) => verify_mix(ctx, item, mixer),
            ItemAction::AddDecryption => add_decryption(ctx, item),
            ItemAction::AddOrSignPlaintexts => add_or_sign_plaintexts(ctx, item),
        }
    }

    fn load_config(&self) -> Option<Config> {
        let bytes = self.board.get(&Name::Config).ok()??;
        serde_json::from_slice(&bytes).ok()
    }

    /// Aggregate this cycle's errors into a single `ERROR(self)` file.
    fn post_errors(&self, errors: &[String]) {
        if errors.is_empty() {
            return;
        }
        let message = errors.join("; ");
        if let Err(e) = self.board.add_error(self.self_id, &message) {
            tracing::error!("failed to post ERROR({}) to the board: {e}", self.self_id);
        }
    }
}

fn action_label(action: &ItemAction) -> String {
    match action {
        ItemAction::VerifyMix(mixer) => format!("VerifyMix({mixer})"),
        other => other.as_ref().to_string(),
    }
}

fn log_summary(summary: &CycleSummary) {
    if let Some(msg) = &summary.stopped {
        tracing::warn!(reason = %msg, "cycle stopped");
        return;
    }
    if summary.validated_config {
        tracing::info!("validated and signed Config");
    }
    for (item, label) in &summary.ran {
        tracing::info!(item, action = %label, "ran action");
    }
    for error in &summary.errors {
        tracing::error!(%error, "action failed");
    }
    if summary.ran.is_empty() && summary.errors.is_empty() && !summary.validated_config {
        tracing::debug!("cycle idle: no dispatchable action");
    }
}
