// Chapter 2: Secret Messages.
use super::{
    connections, impact, questions, text, texts, vocabulary, Chapter, MiniGameDefinition,
    VoicePracticeDefinition,
};

const VOCABULARY: [(&str, &str, &str, &str); 5] = [
    ("紙條", "zhǐtiáo", "note (piece of paper)", "The secret message you'll pass in class"),
    ("無聊", "wúliáo", "boring", "How you feel about math class"),
    ("偷偷", "tōutōu", "secretly/quietly", "How you pass notes without getting caught"),
    ("小心", "xiǎoxīn", "be careful", "Warning when the teacher looks your way"),
    ("午餐", "wǔcān", "lunch", "What you want to invite her to share"),
];

const QUESTIONS: [(&str, &str); 8] = [
    ("好無聊", "So boring"),
    ("想不想", "Do you want to"),
    ("一起吃飯", "eat together"),
    ("老師來了", "teacher's coming"),
    ("小心點", "be careful"),
    ("下課見", "see you after class"),
    ("偷偷傳", "pass secretly"),
    ("別被發現", "don't get caught"),
];

const GROUPS: [(&str, &str, [&str; 4], Option<&str>); 3] = [
    ("Secret Actions", "bg-red-100 border-red-300", ["紙條", "偷偷", "小心", "秘密"], None),
    ("Boring Class", "bg-gray-100 border-gray-300", ["無聊", "數學", "課本", "老師"], None),
    ("Romance Hints", "bg-pink-100 border-pink-300", ["約會", "午餐", "喜歡", "一起"], None),
];

pub(super) fn chapter() -> Chapter {
    Chapter {
        id: 2,
        title: text("Secret Messages"),
        subtitle: text("The Art of Note Passing"),
        description: text("During boring math class, you and Xiao Ai discover the thrill of secret communication."),
        setting: text("Mathematics Classroom, Zhongshan High School"),
        required_affection: 60,
        perfect_affection: 85,
        vocabulary: vocabulary(&VOCABULARY),
        mini_games: vec![
            MiniGameDefinition {
                id: text("note_writing_quickfire"),
                title: text("Speed Note Writing"),
                description: text("Type the secret meaning of each note-passing phrase."),
                time_limit: 60,
                affection_impact: impact(18, 12, -6),
                payload: questions(&QUESTIONS),
            },
            MiniGameDefinition {
                id: text("classroom_rebellion_connections"),
                title: text("Classroom Rebellion Connections"),
                description: text("Group these note-passing terms by their secret categories."),
                time_limit: 90,
                affection_impact: impact(22, 15, -10),
                payload: connections(&GROUPS),
            },
        ],
        voice_practice: VoicePracticeDefinition {
            scenario: text("After passing notes all class, you and Xiao Ai meet after school."),
            objective: text("Invite her to lunch and say how much you enjoy your growing friendship"),
            key_phrases: texts(&[
                "今天很刺激 (Today was exciting)",
                "想不想一起吃午餐 (Want to have lunch together)",
                "你很有趣 (You're very interesting)",
                "我很喜歡和你聊天 (I really like chatting with you)",
            ]),
            cultural_context: texts(&[
                "Taking small risks together builds intimacy",
                "Lunch invitations are often the first step toward dating",
            ]),
            success_criteria: texts(&["Successfully invite her to lunch", "Use note-passing vocabulary naturally"]),
            affection_reward: 30,
        },
    }
}
