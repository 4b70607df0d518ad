// Chapter 3: Night Market Date.
use super::{
    impact, pairs, questions, text, texts, vocabulary, Chapter, MiniGameDefinition,
    VoicePracticeDefinition,
};

const VOCABULARY: [(&str, &str, &str, &str); 4] = [
    ("夜市", "yèshì", "night market", "The heart of Taiwanese street food culture"),
    ("好吃", "hǎochī", "delicious", "The compliment every vendor wants to hear"),
    ("多少錢", "duōshǎo qián", "how much does it cost", "You'll say this at every stall"),
    ("請你吃", "qǐng nǐ chī", "my treat", "Offering to pay is a sweet gesture"),
];

const MATCHING_PAIRS: [(&str, &str, &str); 6] = [
    ("夜市", "yèshì", "night market"),
    ("珍珠奶茶", "zhēnzhū nǎichá", "bubble tea"),
    ("臭豆腐", "chòu dòufu", "stinky tofu"),
    ("雞排", "jīpái", "fried chicken cutlet"),
    ("好吃", "hǎochī", "delicious"),
    ("多少錢", "duōshǎo qián", "how much"),
];

const QUESTIONS: [(&str, &str); 6] = [
    ("我請你", "my treat"),
    ("太辣了", "too spicy"),
    ("再來一份", "one more serving"),
    ("好香", "smells good"),
    ("要排隊", "have to queue"),
    ("吃飽了", "I'm full"),
];

pub(super) fn chapter() -> Chapter {
    Chapter {
        id: 3,
        title: text("Night Market Date"),
        subtitle: text("Shilin After Dark"),
        description: text("Xiao Ai offers to show you her favourite stalls. Is it a date? Neither of you will say."),
        setting: text("Shilin Night Market, Taipei"),
        required_affection: 90,
        perfect_affection: 120,
        vocabulary: vocabulary(&VOCABULARY),
        mini_games: vec![
            MiniGameDefinition {
                id: text("night_market_matching"),
                title: text("Snack Stall Matching"),
                description: text("Match every snack to its name before the crowd pushes you along."),
                time_limit: 75,
                affection_impact: impact(20, 12, -8),
                payload: pairs(&MATCHING_PAIRS),
            },
            MiniGameDefinition {
                id: text("vendor_quickfire"),
                title: text("Vendor Small Talk"),
                description: text("Translate what you hear at the stalls, fast."),
                time_limit: 60,
                affection_impact: impact(18, 10, -8),
                payload: questions(&QUESTIONS),
            },
        ],
        voice_practice: VoicePracticeDefinition {
            scenario: text("Sharing a bubble tea on the temple steps after the market."),
            objective: text("Compliment the food, offer to treat her, and ask about her family"),
            key_phrases: texts(&[
                "好好吃 (So delicious)",
                "我請你 (My treat)",
                "你最喜歡吃什麼 (What do you like to eat most?)",
                "下次再來 (Let's come again)",
            ]),
            cultural_context: texts(&["Fighting over the bill is a sign of affection"]),
            success_criteria: texts(&["Offer to pay", "Plan a next visit"]),
            affection_reward: 35,
        },
    }
}
