use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamColor {
    pub primary: &'static str,
    pub secondary: &'static str,
}

/// Lowercased alias -> canonical display name.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("xc hawks", "XC Hawks"),
    ("hawks", "XC Hawks"),
    ("xc hawks varsity", "XC Hawks"),
    ("speedsters", "Speedsters"),
    ("speedsters xc", "Speedsters"),
    ("joggers", "Joggers"),
    ("joggers club", "Joggers"),
    ("all saints", "All Saints"),
    ("basilica of st mary", "Basilica of St Mary"),
    ("blessed sacrament", "Blessed Sacrament"),
    ("holy family", "Holy Family"),
    ("holy spirit", "Holy Spirit"),
    ("nativity", "Nativity"),
    ("oloh", "OLOH"),
    ("our lady of hope", "OLOH"),
    ("queen of angels", "Q of A"),
    ("q of a", "Q of A"),
    ("st agnes", "St Agnes"),
    ("st ambrose", "St Ambrose"),
    ("st ann", "St Ann"),
    ("st anthony", "St Anthony"),
    ("st bernadette", "St Bernadette"),
    ("st francis", "St Francis"),
    ("st james", "St James"),
    ("st john the evangelist", "St John the Evangelist"),
    ("st joseph", "St Joseph"),
    ("st leo", "St Leo"),
    ("st louis", "St Louis"),
    ("st luke", "St Luke"),
    ("st mark", "St Mark"),
    ("st michael", "St Michael"),
    ("st rita", "St Rita"),
    ("st theresa", "St Theresa"),
    ("st thomas more", "St Thomas More"),
    ("st veronica", "St Veronica"),
];

const TEAM_COLORS: &[(&str, TeamColor)] = &[
    ("XC Hawks", color("#1d4ed8", "#60a5fa")),
    ("Speedsters", color("#b91c1c", "#fca5a5")),
    ("Joggers", color("#047857", "#6ee7b7")),
    ("All Saints", color("#8b5cf6", "#c4b5fd")),
    ("Basilica of St Mary", color("#d1d5db", "#9ca3af")),
    ("Blessed Sacrament", color("#ffffff", "#d4d4d4")),
    ("Holy Family", color("#800000", "#b91c1c")),
    ("Holy Spirit", color("#dc2626", "#f87171")),
    ("Nativity", color("#7b1c1c", "#ef4444")),
    ("OLOH", color("#38bdf8", "#bae6fd")),
    ("Q of A", color("#39ff14", "#a3ff8f")),
    ("St Agnes", color("#eab308", "#facc15")),
    ("St Ambrose", color("#dc2626", "#f87171")),
    ("St Ann", color("#facc15", "#fef08a")),
    ("St Anthony", color("#93c5fd", "#bfdbfe")),
    ("St Bernadette", color("#ef4444", "#fca5a5")),
    ("St Francis", color("#7f1d1d", "#f87171")),
    ("St James", color("#b91c1c", "#fca5a5")),
    ("St John the Evangelist", color("#800000", "#f87171")),
    ("St Joseph", color("#84cc16", "#bef264")),
    ("St Leo", color("#f97316", "#fdba74")),
    ("St Louis", color("#6366f1", "#a5b4fc")),
    ("St Luke", color("#ec4899", "#f9a8d4")),
    ("St Mark", color("#0ea5e9", "#bae6fd")),
    ("St Michael", color("#17823b", "#86efac")),
    ("St Rita", color("#065f46", "#34d399")),
    ("St Theresa", color("#f472b6", "#fbcfe8")),
    ("St Thomas More", color("#4169e1", "#93abff")),
    ("St Veronica", color("#4a0d25", "#9f1239")),
];

const fn color(primary: &'static str, secondary: &'static str) -> TeamColor {
    TeamColor { primary, secondary }
}

/// Resolves a raw team string to its canonical display name.
///
/// Unknown names come back trimmed with their original casing, so the
/// function is idempotent over every input.
pub fn canonical_team(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let key = trimmed.to_lowercase();
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn team_color(raw: &str) -> Option<TeamColor> {
    let canonical = canonical_team(raw);
    TEAM_COLORS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, color)| *color)
}
