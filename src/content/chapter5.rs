// Chapter 5: Graduation Confession. Final chapter; its finale fixes the ending.
use super::{
    connections, impact, questions, text, texts, vocabulary, Chapter, MiniGameDefinition,
    VoicePracticeDefinition,
};

const VOCABULARY: [(&str, &str, &str, &str); 4] = [
    ("畢業", "bìyè", "graduation", "The end of high school and the start of everything else"),
    ("告白", "gàobái", "confession of love", "The moment every drama builds toward"),
    ("喜歡你", "xǐhuān nǐ", "I like you", "Simple, direct, terrifying"),
    ("在一起", "zài yīqǐ", "be together", "What you hope she says yes to"),
];

const QUESTIONS: [(&str, &str); 8] = [
    ("畢業快樂", "happy graduation"),
    ("我喜歡你", "I like you"),
    ("在一起", "be together"),
    ("捨不得", "reluctant to part"),
    ("回憶", "memories"),
    ("未來", "the future"),
    ("等我", "wait for me"),
    ("一直", "always"),
];

const GROUPS: [(&str, &str, [&str; 4], Option<&str>); 3] = [
    ("Graduation Day", "bg-indigo-100 border-indigo-300", ["畢業", "典禮", "花束", "合照"], None),
    ("Confession", "bg-red-100 border-red-300", ["告白", "勇氣", "心跳", "答應"], None),
    ("Promises", "bg-emerald-100 border-emerald-300", ["未來", "等待", "永遠", "約定"], Some("約定 is a promise made between two people, often sealed with a pinky swear.")),
];

pub(super) fn chapter() -> Chapter {
    Chapter {
        id: 5,
        title: text("Graduation Confession"),
        subtitle: text("Under the Phoenix Tree"),
        description: text("The last day of school. The phoenix flowers are blooming and you are out of time."),
        setting: text("Zhongshan High School courtyard"),
        required_affection: 150,
        perfect_affection: 200,
        vocabulary: vocabulary(&VOCABULARY),
        mini_games: vec![
            MiniGameDefinition {
                id: text("confession_quickfire"),
                title: text("Finding the Words"),
                description: text("Rehearse what you want to say before your nerves win."),
                time_limit: 70,
                affection_impact: impact(25, 15, -12),
                payload: questions(&QUESTIONS),
            },
            MiniGameDefinition {
                id: text("graduation_connections"),
                title: text("Graduation Day Connections"),
                description: text("Group the memories of your final day."),
                time_limit: 110,
                affection_impact: impact(28, 18, -15),
                payload: connections(&GROUPS),
            },
        ],
        voice_practice: VoicePracticeDefinition {
            scenario: text("Under the phoenix tree after the ceremony, Xiao Ai is waiting for you."),
            objective: text("Tell her how you feel"),
            key_phrases: texts(&[
                "我一直很喜歡你 (I've always liked you)",
                "謝謝你這一年 (Thank you for this year)",
                "我們在一起好嗎 (Will you be with me?)",
                "我會等你 (I will wait for you)",
            ]),
            cultural_context: texts(&["A confession is a serious step; sincerity matters more than grand gestures"]),
            success_criteria: texts(&["Confess your feelings", "Make a promise about the future"]),
            affection_reward: 50,
        },
    }
}
