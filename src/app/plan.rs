//! What a single invocation will do, in order.

use std::collections::BTreeSet;

use chapter_sync_core::SyncOptions;
use chapter_sync_core::sync::DiscoveryOptions;

use crate::app::config_manager::ResolvedSettings;
use crate::cli::Args;

/// Steps of one run: discovery, watch-list additions, then sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunPlan {
    pub(crate) discover: Option<DiscoveryOptions>,
    pub(crate) watch_additions: BTreeSet<i64>,
    pub(crate) sync: SyncOptions,
}

impl RunPlan {
    /// Builds the plan. `now` is the current epoch second, used as the
    /// publication cutoff when future chapters are skipped.
    pub(crate) fn from_args(args: &Args, settings: &ResolvedSettings, now: i64) -> Self {
        let discover = args.discover.then_some(DiscoveryOptions {
            ceiling: settings.max_series_id,
            probe_delay: settings.probe_delay,
        });

        let mut target_series_ids: Vec<i64> = args.update.clone();
        target_series_ids.sort_unstable();
        target_series_ids.dedup();

        Self {
            discover,
            watch_additions: args.watch.iter().copied().collect(),
            sync: SyncOptions {
                force: args.force,
                target_series_ids,
                chapter_delay: settings.chapter_delay,
                publish_cutoff: settings.skip_future.then_some(now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::app::config_manager::resolve_settings;

    fn plan(extra: &[&str]) -> RunPlan {
        let mut argv = vec!["chapter-sync"];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();
        let settings = resolve_settings(&args, None);
        RunPlan::from_args(&args, &settings, 1_700_000_000)
    }

    #[test]
    fn test_plain_run_syncs_everything() {
        let plan = plan(&[]);
        assert!(plan.discover.is_none());
        assert!(plan.watch_additions.is_empty());
        assert!(plan.sync.target_series_ids.is_empty());
        assert_eq!(plan.sync.publish_cutoff, None);
    }

    #[test]
    fn test_flags_map_into_plan() {
        let plan = plan(&["--discover", "-w", "3,1,3", "-u", "9,2,9", "-f", "--skip-future"]);
        assert_eq!(plan.discover.map(|d| d.ceiling), Some(1000));
        assert_eq!(plan.watch_additions, BTreeSet::from([1, 3]));
        assert_eq!(plan.sync.target_series_ids, vec![2, 9]);
        assert!(plan.sync.force);
        assert_eq!(plan.sync.publish_cutoff, Some(1_700_000_000));
    }
}
