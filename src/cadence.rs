// Refresh-cadence state machine.
//
// Classifies the current moment into one of five buckets (off day, live,
// starting soon, later today, idle) and selects the polling interval and
// countdown flag for the external scheduler. The only cross-tick state is the
// previous live-games boolean, kept to notify the keep-display-awake
// collaborator on transitions.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Interval tiers (seconds)
// ---------------------------------------------------------------------------

pub const INTERVAL_OFF_DAY: u64 = 3600;
pub const INTERVAL_STARTING_SOON: u64 = 60;
pub const INTERVAL_LATER_TODAY: u64 = 900;
pub const INTERVAL_IDLE: u64 = 3600;

/// How far ahead a kickoff counts as "starting soon."
const SOON_WINDOW_MINUTES: i64 = 30;

// ---------------------------------------------------------------------------
// Game status feed
// ---------------------------------------------------------------------------

/// One scheduled or in-progress game from the external status feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStatusRecord {
    pub start_time: DateTime<Utc>,
    /// Explicit in-progress flag where the feed provides one.
    #[serde(default)]
    pub live: bool,
    /// Free-text status ("2nd Quarter", "Halftime", "Final", ...) for feeds
    /// without a structured flag.
    #[serde(default)]
    pub status: Option<String>,
    pub home: String,
    pub away: String,
}

impl GameStatusRecord {
    /// Live if the structured flag says so or the free-text status carries a
    /// quarter/overtime/halftime marker.
    pub fn is_live(&self) -> bool {
        self.live || self.status.as_deref().map_or(false, status_text_is_live)
    }
}

/// Classify a free-text status string as in-progress.
///
/// Finished markers win: "Final/OT" mentions overtime but the game is over.
fn status_text_is_live(status: &str) -> bool {
    let s = status.to_lowercase();
    if s.contains("final") || s.contains("postponed") || s.contains("canceled") {
        return false;
    }
    if s.contains("quarter") || s.contains("qtr") || s.contains("halftime") || s.contains("overtime")
    {
        return true;
    }
    // Short markers only match as whole tokens ("ot" is a substring of far
    // too many words).
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|tok| matches!(tok, "1st" | "2nd" | "3rd" | "4th" | "ot" | "2ot" | "half"))
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Which classification rule fired, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceReason {
    OffDay,
    LiveGames,
    StartingSoon,
    LaterToday,
    Idle,
}

/// The selected refresh cadence. Recomputed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceDecision {
    pub interval_secs: u64,
    pub show_countdown: bool,
    pub reason: CadenceReason,
}

// ---------------------------------------------------------------------------
// Display-wake collaborator
// ---------------------------------------------------------------------------

/// One-way signal invoked whenever the any-game-live boolean flips between
/// consecutive evaluations.
pub trait DisplayWake: Send + Sync {
    fn live_state_changed(&self, live: bool);
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// The cadence classifier. Evaluate once per tick from a single timeline;
/// `evaluate` takes `&mut self` precisely so re-entrant evaluation cannot
/// race the previous-live-state comparison.
pub struct RefreshCadencePolicy {
    /// Provider-configured fast tier used while games are live.
    live_interval_secs: u64,
    was_live: Option<bool>,
    display_wake: Option<Arc<dyn DisplayWake>>,
}

impl RefreshCadencePolicy {
    pub fn new(live_interval_secs: u64) -> Self {
        Self {
            live_interval_secs,
            was_live: None,
            display_wake: None,
        }
    }

    pub fn with_display_wake(mut self, wake: Arc<dyn DisplayWake>) -> Self {
        self.display_wake = Some(wake);
        self
    }

    /// Classify `now` against the current game feed and return the cadence.
    ///
    /// Rules, in precedence order:
    /// 1. Off day: Tue/Wed always; Fri unless it is the post-Thanksgiving
    ///    Friday or games are scheduled today; Sat unless within the
    ///    late-season window (Dec 15 through February) or games are
    ///    scheduled today.
    /// 2. Any live game -> fast interval, countdown shown.
    /// 3. Any kickoff within 30 minutes -> 60s.
    /// 4. Any kickoff later today -> 15min.
    /// 5. Everything finished, or nothing scheduled -> 1hr.
    pub fn evaluate(&mut self, now: DateTime<Utc>, games: &[GameStatusRecord]) -> CadenceDecision {
        let today = now.date_naive();
        let todays: Vec<&GameStatusRecord> =
            games.iter().filter(|g| g.start_time.date_naive() == today).collect();

        let any_live = todays.iter().any(|g| g.is_live());
        self.note_live_state(any_live);

        let decision = self.classify(now, today, &todays, any_live);
        debug!(
            "cadence evaluated: {:?} every {}s",
            decision.reason, decision.interval_secs
        );
        decision
    }

    fn classify(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
        todays: &[&GameStatusRecord],
        any_live: bool,
    ) -> CadenceDecision {
        let has_games_today = !todays.is_empty();
        let off_day = match today.weekday() {
            Weekday::Tue | Weekday::Wed => true,
            Weekday::Fri => !is_post_thanksgiving_friday(today) && !has_games_today,
            Weekday::Sat => !in_late_season_window(today) && !has_games_today,
            _ => false,
        };
        if off_day {
            return CadenceDecision {
                interval_secs: INTERVAL_OFF_DAY,
                show_countdown: false,
                reason: CadenceReason::OffDay,
            };
        }

        if any_live {
            return CadenceDecision {
                interval_secs: self.live_interval_secs,
                show_countdown: true,
                reason: CadenceReason::LiveGames,
            };
        }

        let soon_cutoff = now + Duration::minutes(SOON_WINDOW_MINUTES);
        if todays
            .iter()
            .any(|g| g.start_time > now && g.start_time <= soon_cutoff)
        {
            return CadenceDecision {
                interval_secs: INTERVAL_STARTING_SOON,
                show_countdown: false,
                reason: CadenceReason::StartingSoon,
            };
        }

        if todays.iter().any(|g| g.start_time > now) {
            return CadenceDecision {
                interval_secs: INTERVAL_LATER_TODAY,
                show_countdown: false,
                reason: CadenceReason::LaterToday,
            };
        }

        CadenceDecision {
            interval_secs: INTERVAL_IDLE,
            show_countdown: false,
            reason: CadenceReason::Idle,
        }
    }

    fn note_live_state(&mut self, any_live: bool) {
        if let Some(prev) = self.was_live {
            if prev != any_live {
                debug!("live-game state transition: live={}", any_live);
                if let Some(wake) = &self.display_wake {
                    wake.live_state_changed(any_live);
                }
            }
        }
        self.was_live = Some(any_live);
    }
}

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// Fourth Thursday of November for the given year.
fn thanksgiving(year: i32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, 11, 1).expect("November 1st always exists");
    let to_thursday = (Weekday::Thu.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    first + Days::new(u64::from(to_thursday) + 21)
}

/// The Friday immediately following Thanksgiving: games are played.
fn is_post_thanksgiving_friday(date: NaiveDate) -> bool {
    date.month() == 11 && thanksgiving(date.year()) + Days::new(1) == date
}

/// Late-season Saturday window: Dec 15 through the end of February.
fn in_late_season_window(date: NaiveDate) -> bool {
    match date.month() {
        12 => date.day() >= 15,
        1 | 2 => true,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
