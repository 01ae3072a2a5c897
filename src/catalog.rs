use serde::Serialize;

/// One of the fourteen symbolic paths offered as a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Path {
    pub id: u8,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub theme: &'static str,
    pub icon: &'static str,
}

pub const PATH_COUNT: usize = 14;

static PATHS: [Path; PATH_COUNT] = [
    Path { id: 1, name: "The Flame of Agni", subtitle: "Act with fire. Follow passion and leap.", theme: "adventurous, impulsive", icon: "🔥" },
    Path { id: 2, name: "The Serpent of Shesha", subtitle: "Wait. Watch. Observe the coils of time.", theme: "patient, thoughtful", icon: "🐍" },
    Path { id: 3, name: "The Mirror of Maya", subtitle: "Not all is as it seems.", theme: "confused, doubting", icon: "🪞" },
    Path { id: 4, name: "The Path of Arjuna", subtitle: "Face your dharma. Clarity lies in duty.", theme: "conflicted but willing to act", icon: "🏹" },
    Path { id: 5, name: "The Ocean of Samudra", subtitle: "Flow and let things settle.", theme: "go with the flow, unsure", icon: "🌊" },
    Path { id: 6, name: "The Crown of Saraswati", subtitle: "Seek wisdom before action.", theme: "intellectual, contemplative", icon: "👑" },
    Path { id: 7, name: "The Veil of Chhaya", subtitle: "Retreat and reflect in silence.", theme: "overwhelmed, introverted", icon: "🌙" },
    Path { id: 8, name: "The Thunder of Indra", subtitle: "Strike while the skies are electric.", theme: "bold, assertive, decisive", icon: "⚡" },
    Path { id: 9, name: "The Lotus of Lakshmi", subtitle: "Choose grace and abundance.", theme: "optimistic, wanting good fortune", icon: "🪷" },
    Path { id: 10, name: "The Drum of Nandi", subtitle: "Trust the rhythm of your instincts.", theme: "intuitive, primal response", icon: "🥁" },
    Path { id: 11, name: "The Forge of Vishwakarma", subtitle: "Build. Shape. Plan it carefully.", theme: "creative and constructive", icon: "🔨" },
    Path { id: 12, name: "The Bow of Rama", subtitle: "Act with righteousness, even if it's hard.", theme: "morally grounded decision-making", icon: "🎯" },
    Path { id: 13, name: "The Sand of Kaal", subtitle: "Time will reveal the path.", theme: "accepting uncertainty, detached", icon: "⏳" },
    Path { id: 14, name: "The Eye of Kali", subtitle: "Destroy illusion. Cut to truth.", theme: "raw, fierce clarity, transformation", icon: "👁️" },
];

/// The full catalog, in card order.
pub fn all() -> &'static [Path] {
    &PATHS
}

pub fn by_id(id: u8) -> Option<&'static Path> {
    PATHS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fourteen_unique_ids() {
        let ids: HashSet<u8> = all().iter().map(|p| p.id).collect();
        assert_eq!(all().len(), PATH_COUNT);
        assert_eq!(ids.len(), PATH_COUNT);
    }

    #[test]
    fn test_ids_are_ordered_one_through_fourteen() {
        let ids: Vec<u8> = all().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=14).collect::<Vec<u8>>());
    }

    #[test]
    fn test_catalog_is_stable_across_loads() {
        assert_eq!(all(), all());
        assert_eq!(all()[0].name, "The Flame of Agni");
        assert_eq!(all()[13].name, "The Eye of Kali");
    }

    #[test]
    fn test_by_id() {
        assert_eq!(by_id(4).map(|p| p.name), Some("The Path of Arjuna"));
        assert!(by_id(0).is_none());
        assert!(by_id(15).is_none());
    }
}
