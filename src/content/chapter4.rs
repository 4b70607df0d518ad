// Chapter 4: Typhoon Day.
use super::{
    connections, impact, pairs, text, texts, vocabulary, Chapter, MiniGameDefinition,
    VoicePracticeDefinition,
};

const VOCABULARY: [(&str, &str, &str, &str); 4] = [
    ("颱風", "táifēng", "typhoon", "School closes when the city declares a typhoon day"),
    ("停課", "tíngkè", "classes cancelled", "The two words every student hopes to hear"),
    ("擔心", "dānxīn", "worried", "Showing concern for someone is a quiet form of care"),
    ("陪你", "péi nǐ", "keep you company", "Staying close when it matters"),
];

const MATCHING_PAIRS: [(&str, &str, &str); 6] = [
    ("颱風", "táifēng", "typhoon"),
    ("停課", "tíngkè", "classes cancelled"),
    ("下雨", "xiàyǔ", "to rain"),
    ("雨傘", "yǔsǎn", "umbrella"),
    ("停電", "tíngdiàn", "power outage"),
    ("泡麵", "pàomiàn", "instant noodles"),
];

const GROUPS: [(&str, &str, [&str; 4], Option<&str>); 3] = [
    ("Weather", "bg-sky-100 border-sky-300", ["颱風", "下雨", "打雷", "大風"], None),
    ("Supplies", "bg-amber-100 border-amber-300", ["泡麵", "手電筒", "蠟燭", "礦泉水"], None),
    ("Feelings", "bg-rose-100 border-rose-300", ["擔心", "害怕", "安心", "溫暖"], Some("安心 is the feeling of being safe with someone.")),
];

pub(super) fn chapter() -> Chapter {
    Chapter {
        id: 4,
        title: text("Typhoon Day"),
        subtitle: text("Stuck Inside Together"),
        description: text("A typhoon shuts the city down and the study group shrinks to two."),
        setting: text("Xiao Ai's family temple, Datong District"),
        required_affection: 120,
        perfect_affection: 155,
        vocabulary: vocabulary(&VOCABULARY),
        mini_games: vec![
            MiniGameDefinition {
                id: text("typhoon_matching"),
                title: text("Typhoon Prep Vocabulary"),
                description: text("Match the words you need when the wind picks up."),
                time_limit: 80,
                affection_impact: impact(22, 14, -10),
                payload: pairs(&MATCHING_PAIRS),
            },
            MiniGameDefinition {
                id: text("storm_connections"),
                title: text("Storm Night Connections"),
                description: text("Sort the storm into weather, supplies and feelings."),
                time_limit: 100,
                affection_impact: impact(26, 16, -12),
                payload: connections(&GROUPS),
            },
        ],
        voice_practice: VoicePracticeDefinition {
            scenario: text("The power is out. Candlelight, rain on the roof, and Xiao Ai is afraid of thunder."),
            objective: text("Comfort her and share something personal"),
            key_phrases: texts(&[
                "別擔心 (Don't worry)",
                "我陪你 (I'll keep you company)",
                "有你在我很安心 (I feel safe with you here)",
                "我想告訴你一件事 (I want to tell you something)",
            ]),
            cultural_context: texts(&["Care is shown through actions more often than words"]),
            success_criteria: texts(&["Comfort her", "Share a personal story"]),
            affection_reward: 40,
        },
    }
}
