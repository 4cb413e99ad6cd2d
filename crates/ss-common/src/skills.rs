use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Skill dimensions tracked for every worker and requested by every task.
///
/// Declaration order is the order the skills occupy in the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Skill {
    #[strum(serialize = "skill_engine_assembly")]
    EngineAssembly,
    #[strum(serialize = "skill_painting_finishing")]
    PaintingFinishing,
    #[strum(serialize = "skill_ev_battery_assembly")]
    EvBatteryAssembly,
    #[strum(serialize = "skill_ckd_kitting")]
    CkdKitting,
    #[strum(serialize = "skill_quality_inspection")]
    QualityInspection,
}

impl Skill {
    pub fn all() -> impl Iterator<Item = Skill> {
        Skill::iter()
    }

    /// Record key, e.g. `skill_ckd_kitting`.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Human-readable label used in explanations.
    pub fn label(self) -> &'static str {
        match self {
            Skill::EngineAssembly => "Engine Assembly",
            Skill::PaintingFinishing => "Painting",
            Skill::EvBatteryAssembly => "EV Battery",
            Skill::CkdKitting => "CKD Kitting",
            Skill::QualityInspection => "Quality Inspection",
        }
    }

    /// Resolve a record key such as `skill_ckd_kitting`.
    pub fn from_key(key: &str) -> Option<Skill> {
        Skill::iter().find(|skill| skill.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_key() {
        for skill in Skill::all() {
            assert_eq!(Skill::from_key(skill.key()), Some(skill));
        }
        assert_eq!(Skill::from_key("skill_welding"), None);
    }

    #[test]
    fn five_dimensions_in_schema_order() {
        let keys: Vec<&str> = Skill::all().map(Skill::key).collect();
        assert_eq!(
            keys,
            vec![
                "skill_engine_assembly",
                "skill_painting_finishing",
                "skill_ev_battery_assembly",
                "skill_ckd_kitting",
                "skill_quality_inspection",
            ]
        );
    }
}
