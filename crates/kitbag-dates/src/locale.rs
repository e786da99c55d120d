//! Supported display locales and their relative-time phrasing

/// Locales with translated relative phrases. Unknown tags fall back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Nl,
    Fr,
    De,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Locale {
    /// Resolve a BCP 47 tag such as `en-US` or `de` by its language subtag.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "nl" => Locale::Nl,
            "fr" => Locale::Fr,
            "de" => Locale::De,
            _ => Locale::En,
        }
    }

    pub fn chrono_locale(&self) -> chrono::Locale {
        match self {
            Locale::En => chrono::Locale::en_US,
            Locale::Nl => chrono::Locale::nl_NL,
            Locale::Fr => chrono::Locale::fr_FR,
            Locale::De => chrono::Locale::de_DE,
        }
    }

    /// `count` is signed: negative counts and `past` zero read as "ago".
    pub fn relative_phrase(&self, count: i64, unit: Unit, past: bool) -> String {
        let n = count.unsigned_abs();
        let past = past || count < 0;
        let unit = self.unit_name(unit, n);

        match (self, past) {
            (Locale::En, true) => format!("{} {} ago", n, unit),
            (Locale::En, false) => format!("in {} {}", n, unit),
            (Locale::Nl, true) => format!("{} {} geleden", n, unit),
            (Locale::Nl, false) => format!("over {} {}", n, unit),
            (Locale::Fr, true) => format!("il y a {} {}", n, unit),
            (Locale::Fr, false) => format!("dans {} {}", n, unit),
            (Locale::De, true) => format!("vor {} {}", n, unit),
            (Locale::De, false) => format!("in {} {}", n, unit),
        }
    }

    fn unit_name(&self, unit: Unit, n: u64) -> &'static str {
        // French treats zero as singular
        let singular = match self {
            Locale::Fr => n <= 1,
            _ => n == 1,
        };

        let (one, many) = match (self, unit) {
            (Locale::En, Unit::Year) => ("year", "years"),
            (Locale::En, Unit::Month) => ("month", "months"),
            (Locale::En, Unit::Day) => ("day", "days"),
            (Locale::En, Unit::Hour) => ("hour", "hours"),
            (Locale::En, Unit::Minute) => ("minute", "minutes"),
            (Locale::En, Unit::Second) => ("second", "seconds"),

            (Locale::Nl, Unit::Year) => ("jaar", "jaar"),
            (Locale::Nl, Unit::Month) => ("maand", "maanden"),
            (Locale::Nl, Unit::Day) => ("dag", "dagen"),
            (Locale::Nl, Unit::Hour) => ("uur", "uur"),
            (Locale::Nl, Unit::Minute) => ("minuut", "minuten"),
            (Locale::Nl, Unit::Second) => ("seconde", "seconden"),

            (Locale::Fr, Unit::Year) => ("an", "ans"),
            (Locale::Fr, Unit::Month) => ("mois", "mois"),
            (Locale::Fr, Unit::Day) => ("jour", "jours"),
            (Locale::Fr, Unit::Hour) => ("heure", "heures"),
            (Locale::Fr, Unit::Minute) => ("minute", "minutes"),
            (Locale::Fr, Unit::Second) => ("seconde", "secondes"),

            // dative plural after "vor" and "in"
            (Locale::De, Unit::Year) => ("Jahr", "Jahren"),
            (Locale::De, Unit::Month) => ("Monat", "Monaten"),
            (Locale::De, Unit::Day) => ("Tag", "Tagen"),
            (Locale::De, Unit::Hour) => ("Stunde", "Stunden"),
            (Locale::De, Unit::Minute) => ("Minute", "Minuten"),
            (Locale::De, Unit::Second) => ("Sekunde", "Sekunden"),
        };

        if singular {
            one
        } else {
            many
        }
    }
}
