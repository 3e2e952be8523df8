//! Option sets for the demographic and preference questions.

choice_enum! {
    /// How the respondent identifies.
    pub enum Identity {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        NonBinary => ("non-binary", "Non-binary"),
        Other => ("other", "Other"),
    }
}

choice_enum! {
    pub enum YearOfStudy {
        First => ("1", "First Year"),
        Second => ("2", "Second Year"),
        Third => ("3", "Third Year"),
        Fourth => ("4", "Fourth Year"),
        FifthOrAbove => ("5+", "Fifth Year or above"),
        Postgraduate => ("postgraduate", "Postgraduate"),
    }
}

choice_enum! {
    /// Who the respondent would like to be matched with.
    pub enum PartnerPreference {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        NonBinary => ("non-binary", "Non-binary"),
        Any => ("any", "Any gender"),
    }
}

choice_enum! {
    pub enum DateType {
        Blind => ("blind", "Blind Date"),
        Activity => ("activity", "Activity Date"),
        Dinner => ("dinner", "Dinner Date"),
        Coffee => ("coffee", "Coffee Date"),
    }
}

choice_enum! {
    pub enum RelationshipType {
        Casual => ("casual", "Casual Relationship"),
        Serious => ("serious", "Serious Relationship"),
        Friendship => ("friendship", "Friendship"),
        Open => ("open", "Open to anything"),
    }
}

choice_enum! {
    pub enum Interest {
        Sports => ("sports", "Sports"),
        Music => ("music", "Music"),
        Art => ("art", "Art"),
        Technology => ("technology", "Technology"),
        Travel => ("travel", "Travel"),
        Food => ("food", "Food"),
        Reading => ("reading", "Reading"),
        Movies => ("movies", "Movies"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice;

    #[test]
    fn parse_uses_wire_value() {
        assert_eq!(Identity::parse("non-binary"), Some(Identity::NonBinary));
        assert_eq!(YearOfStudy::parse("5+"), Some(YearOfStudy::FifthOrAbove));
        assert_eq!(Identity::parse("Non-binary"), None);
        assert_eq!(Interest::parse(""), None);
    }

    #[test]
    fn serde_matches_wire_value() {
        for year in YearOfStudy::ALL {
            let json = serde_json::to_value(year).unwrap();
            assert_eq!(json, serde_json::Value::String(year.value().to_string()));
        }
    }
}
