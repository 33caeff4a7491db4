use chrono::NaiveDate;

/// CLI command parsed from arguments
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Dashboard: XP, rank, streaks, today's counts
    Status,
    /// Log an ANT event
    Log {
        category: String,
        intensity: u8,
        attempted: bool,
        notes: String,
        context: String,
        self_talk: Vec<String>,
        body: Vec<String>,
        game_face_id: Option<String>,
    },
    /// Record a completed risk scenario
    Risk { scenario_id: String },
    /// Create a game face
    CreateGameFace {
        name: String,
        power_words: Vec<String>,
        model_person: Option<String>,
        source: String,
    },
    /// List game faces
    ListGameFaces,
    /// Claim a streak reward by its day threshold
    Claim { days: u32 },
    /// Flip a rule toggle
    ToggleRule { rule_id: String },
    /// List rules with their toggles
    ListRules,
    /// Log a completed exposure
    Exposure {
        exposure_id: String,
        date: Option<NaiveDate>,
    },
    /// Score a metric for a day
    Metric {
        metric_id: String,
        score: u8,
        date: Option<NaiveDate>,
    },
    /// Save the positive of the day
    Positive {
        text: String,
        date: Option<NaiveDate>,
    },
    /// Park a worry for later
    Worry { text: String },
    /// Replace the boundary policy
    Policy {
        will_do: String,
        wont_do: String,
        exit_date: String,
        notice_date: String,
        script_id: Option<String>,
    },
    /// Print a script's text
    Script { script_id: String },
    /// Set or flip dark mode
    DarkMode { enabled: Option<bool> },
    /// Spin the power-word roulette
    Spin { ticks: u32 },
    /// Print the stored record
    Dump { pretty: bool },
}
