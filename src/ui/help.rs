//! Bilingual help topics for the studio controls.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HelpSection {
    Mood,
    Vocal,
    Structure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HelpLanguage {
    #[default]
    En,
    Ar,
}

impl HelpLanguage {
    pub fn is_right_to_left(&self) -> bool {
        matches!(self, HelpLanguage::Ar)
    }

    /// The other language, for a toggle.
    pub fn toggled(&self) -> Self {
        match self {
            HelpLanguage::En => HelpLanguage::Ar,
            HelpLanguage::Ar => HelpLanguage::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpDetail {
    pub label: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpTopic {
    pub title: &'static str,
    pub description: &'static str,
    pub details: &'static [HelpDetail],
}

const fn detail(label: &'static str, text: &'static str) -> HelpDetail {
    HelpDetail { label, text }
}

static MOOD_EN: HelpTopic = HelpTopic {
    title: "Mood Dynamics",
    description: "Control the emotional atmosphere and sonic character of the generation.",
    details: &[
        detail("Tone", "Controls the emotional color (Dark/Minor vs Bright/Major)."),
        detail("Energy", "Controls intensity and density (Chill/Ambient vs Hype/Aggressive)."),
        detail("Texture", "Controls audio fidelity (Clean/Hi-Fi vs Gritty/Lo-Fi)."),
    ],
};

static MOOD_AR: HelpTopic = HelpTopic {
    title: "ديناميكيات المزاج",
    description: "تحكم في الجو العاطفي والطابع الصوتي للأغنية.",
    details: &[
        detail("النغمة (Tone)", "يتحكم في اللون العاطفي (مظلم/حزين مقابل مشرق/سعيد)."),
        detail("الطاقة (Energy)", "يتحكم في الكثافة والحماس (هادئ مقابل صاخب)."),
        detail("الملمس (Texture)", "يتحكم في نقاء الصوت (نقي/عالي الجودة مقابل خشن/لو-فاي)."),
    ],
};

static VOCAL_EN: HelpTopic = HelpTopic {
    title: "Vocal Chain",
    description: "Define the singer's identity and processing style.",
    details: &[
        detail("Gender", "Select Male, Female, Duet, or Robotic AI voices."),
        detail("Texture", "Vocal character (Airy, Raspy, Auto-Tuned, etc.)."),
        detail("Language", "Target language for lyrics generation."),
    ],
};

static VOCAL_AR: HelpTopic = HelpTopic {
    title: "سلسلة الصوت",
    description: "حدد هوية المغني وأسلوب المعالجة الصوتية.",
    details: &[
        detail("الجنس (Gender)", "اختر صوت ذكر، أنثى، ثنائي، أو روبوت."),
        detail("الملمس (Texture)", "طابع الصوت (هوائي، أجش، أوتوتيون، إلخ)."),
        detail("اللغة (Language)", "اللغة المستهدفة لكتابة الكلمات."),
    ],
};

static STRUCTURE_EN: HelpTopic = HelpTopic {
    title: "Structure Engine",
    description: "Architectural layout of the song's sections.",
    details: &[
        detail("Mode", "Determines section layout (Verse/Chorus vs Build/Drop)."),
        detail("Intro", "Adds a dedicated instrumental opening tag."),
        detail("Radio Edit", "Optimizes structure for a tight <3 min duration."),
    ],
};

static STRUCTURE_AR: HelpTopic = HelpTopic {
    title: "محرك البنية",
    description: "التخطيط الهيكلي لأقسام الأغنية.",
    details: &[
        detail("النمط (Mode)", "يحدد ترتيب الأقسام (كوبليه/كورس مقابل بناء/دروب)."),
        detail("مقدمة (Intro)", "يضيف علامة افتتاحية موسيقية."),
        detail("نسخة راديو", "يحسن البنية لتكون قصيرة ومكثفة (أقل من 3 دقائق)."),
    ],
};

pub fn help_topic(section: HelpSection, language: HelpLanguage) -> &'static HelpTopic {
    match (section, language) {
        (HelpSection::Mood, HelpLanguage::En) => &MOOD_EN,
        (HelpSection::Mood, HelpLanguage::Ar) => &MOOD_AR,
        (HelpSection::Vocal, HelpLanguage::En) => &VOCAL_EN,
        (HelpSection::Vocal, HelpLanguage::Ar) => &VOCAL_AR,
        (HelpSection::Structure, HelpLanguage::En) => &STRUCTURE_EN,
        (HelpSection::Structure, HelpLanguage::Ar) => &STRUCTURE_AR,
    }
}
