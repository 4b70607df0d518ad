// Chapter 1: First Day Destiny.
use super::{
    connections, impact, pairs, text, texts, vocabulary, Chapter, MiniGameDefinition,
    VoicePracticeDefinition,
};

const VOCABULARY: [(&str, &str, &str, &str); 5] = [
    ("請多指教", "qǐng duō zhǐjiào", "Please guide me / Please take care of me", "Shows humility and respect when meeting new people."),
    ("新同學", "xīn tóngxué", "new classmate", "How you'll be introduced on your first day."),
    ("很高興認識你", "hěn gāoxìng rènshi nǐ", "Very happy to meet you", "The polite response when introduced; 很 shows real enthusiasm."),
    ("我來自美國", "wǒ láizì Měiguó", "I come from America", "Guaranteed to spark questions from your classmates."),
    ("同桌", "tóngzhuō", "desk partner", "Your seat partner, often a friendship that lasts for years."),
];

const MATCHING_PAIRS: [(&str, &str, &str); 8] = [
    ("請多指教", "qǐng duō zhǐjiào", "Please guide me"),
    ("新同學", "xīn tóngxué", "new classmate"),
    ("很高興認識你", "hěn gāoxìng rènshi nǐ", "happy to meet you"),
    ("我來自美國", "wǒ láizì Měiguó", "I come from America"),
    ("同桌", "tóngzhuō", "desk partner"),
    ("自我介紹", "zìwǒ jièshào", "self introduction"),
    ("台灣文化", "Táiwān wénhuà", "Taiwanese culture"),
    ("多多指教", "duōduō zhǐjiào", "please guide me (emphatic)"),
];

const GROUPS: [(&str, &str, [&str; 4], Option<&str>); 3] = [
    (
        "People & Relationships",
        "bg-blue-100 border-blue-300",
        ["老師", "同學", "尊敬", "禮貌"],
        Some("Taiwan schools emphasize hierarchical respect; teachers are highly revered."),
    ),
    (
        "School Daily Life",
        "bg-green-100 border-green-300",
        ["上課", "下課", "制服", "書包"],
        Some("School life is structured around uniforms, strict schedules and set routines."),
    ),
    (
        "Student Values",
        "bg-purple-100 border-purple-300",
        ["乖巧", "認真", "努力", "成績"],
        Some("Being 乖巧, 認真 and 努力 are the most valued traits in Taiwanese students."),
    ),
];

const KEY_PHRASES: [&str; 6] = [
    "謝謝你這麼友善 (Thank you for being so friendly)",
    "台灣真的很美 (Taiwan is really beautiful)",
    "我想更了解台灣文化 (I want to understand Taiwanese culture better)",
    "你可以教我嗎 (Can you teach me?)",
    "我有點緊張 (I'm a bit nervous)",
    "你人真好 (You're really nice)",
];

pub(super) fn chapter() -> Chapter {
    Chapter {
        id: 1,
        title: text("First Day Destiny"),
        subtitle: text("The Transfer Student Arrives"),
        description: text("Your heart pounds as you step into Zhongshan High School. Will you make the right first impression?"),
        setting: text("Zhongshan High School, Classroom 3-A"),
        required_affection: 35,
        perfect_affection: 55,
        vocabulary: vocabulary(&VOCABULARY),
        mini_games: vec![
            MiniGameDefinition {
                id: text("intro_vocabulary_matching"),
                title: text("First Impressions Vocabulary"),
                description: text("Master the essential phrases for a great first impression."),
                time_limit: 90,
                affection_impact: impact(20, 12, -8),
                payload: pairs(&MATCHING_PAIRS),
            },
            MiniGameDefinition {
                id: text("classroom_connections"),
                title: text("Taiwanese School Culture Connections"),
                description: text("Group these terms to prove you're ready to fit in."),
                time_limit: 120,
                affection_impact: impact(25, 15, -12),
                payload: connections(&GROUPS),
            },
        ],
        voice_practice: VoicePracticeDefinition {
            scenario: text("Xiao Ai approaches you during the break between classes. This is your first real conversation with her."),
            objective: text("Build rapport with Xiao Ai while showing humility and interest in Taiwanese culture"),
            key_phrases: texts(&KEY_PHRASES),
            cultural_context: texts(&[
                "Admitting nervousness earns respect, not derision",
                "Genuine interest in Taiwan is the fastest way to win hearts",
                "Asking someone to teach you shows trust",
            ]),
            success_criteria: texts(&[
                "Use at least 4 key phrases naturally",
                "Ask at least one thoughtful question",
                "Maintain the conversation for 6-8 exchanges",
            ]),
            affection_reward: 30,
        },
    }
}
