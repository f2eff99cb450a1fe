//! Competitor mention detection.

/// Transport brands the assistant must not recommend: airlines, coach lines,
/// ride-hailing and third-party booking platforms, in Thai and English forms.
const COMPETITORS: &[&str] = &[
    // Airlines
    "AirAsia", "แอร์เอเชีย",
    "Nok Air", "นกแอร์",
    "Thai Lion Air", "ไทยไลอ้อนแอร์",
    "VietJet", "เวียตเจ็ท",
    "Bangkok Airways", "บางกอกแอร์เวย์ส",
    "Thai Airways", "การบินไทย",
    "Thai Smile", "ไทยสมายล์",
    // Coach lines
    "Nakhonchai Air", "นครชัยแอร์",
    "Sombat Tour", "สมบัติทัวร์",
    "บุษราคัมทัวร์", "เชิดชัยทัวร์",
    "บขส",
    // Ride-hailing
    "Grab", "แกร็บ",
    "Bolt", "โบลท์",
    "InDriver",
    "Uber", "อูเบอร์",
    // Booking platforms
    "12Go", "Traveloka", "Agoda",
];

/// Detects competitor brand mentions with a case-insensitive substring scan.
pub struct CompetitorDetector;

impl CompetitorDetector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the mentioned brands (up to three), or `None` when clean.
    pub fn check(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        let found: Vec<&str> = COMPETITORS
            .iter()
            .copied()
            .filter(|c| lower.contains(&c.to_lowercase()))
            .take(3)
            .collect();

        if found.is_empty() {
            None
        } else {
            Some(format!("competitor mentioned: {}", found.join(", ")))
        }
    }
}

impl Default for CompetitorDetector {
    fn default() -> Self {
        Self::new()
    }
}
