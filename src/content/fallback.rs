//! Bundled default content per tier
//!
//! Used when the content API has not been seeded yet or cannot be reached.

use super::model::{Difficulty, Lesson, Module, Question, Quiz, QuizConfig};

/// Default icon and color for fallback modules of a tier
pub fn style(difficulty: Difficulty) -> (&'static str, &'static str) {
    match difficulty {
        Difficulty::Beginner => ("sprout", "#4caf50"),
        Difficulty::Intermediate => ("herb", "#2e7d32"),
        Difficulty::Expert => ("tree", "#1b5e20"),
    }
}

/// The default module list for a tier
pub fn modules(difficulty: Difficulty) -> Vec<Module> {
    let modules = match difficulty {
        Difficulty::Beginner => beginner(),
        Difficulty::Intermediate => intermediate(),
        Difficulty::Expert => expert(),
    };

    let (icon, color) = style(difficulty);
    modules
        .into_iter()
        .map(|mut m| {
            m.difficulty = difficulty;
            m.icon = Some(icon.to_string());
            m.color = Some(color.to_string());
            m
        })
        .collect()
}

fn module(
    id: &str,
    title: &str,
    description: &str,
    estimated_time: &str,
    lessons: Vec<Lesson>,
    quizzes: Vec<Quiz>,
) -> Module {
    let mut module = Module::new(id, title, Difficulty::Beginner);
    module.description = description.to_string();
    module.estimated_time = estimated_time.to_string();
    module.lessons = lessons;
    module.quiz_config = QuizConfig::Multiple(quizzes);
    module
}

fn lesson(id: u64, title: &str, content: &str, points: &[&str]) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        content: content.to_string(),
        points: points.iter().map(|p| p.to_string()).collect(),
        images: Vec::new(),
        videos: Vec::new(),
    }
}

fn question(id: u64, text: &str, options: &[&str], correct: usize, explanation: &str) -> Question {
    Question {
        id,
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct,
        explanation: explanation.to_string(),
        image: None,
        video: None,
        required: true,
    }
}

fn quiz(id: &str, title: &str, questions: Vec<Question>) -> Quiz {
    Quiz { id: id.to_string(), title: title.to_string(), questions }
}

fn beginner() -> Vec<Module> {
    vec![
        module(
            "soil-basics",
            "Soil Basics",
            "What healthy garden soil is made of and how to tell what you have.",
            "30 minutes",
            vec![
                lesson(
                    1,
                    "What Is Soil?",
                    "Soil is a mixture of minerals, organic matter, water and air. \
                     Sand, silt and clay particles determine the texture of a soil. \
                     Organic matter feeds earthworms and microbes that keep soil alive.",
                    &["Texture comes from sand, silt and clay", "Organic matter feeds soil life"],
                ),
                lesson(
                    2,
                    "Testing Your Soil",
                    "A squeeze test shows texture: clay forms a sticky ribbon while sand crumbles. \
                     Most vegetables prefer a slightly acidic pH between six and seven. \
                     Inexpensive kits measure acidity and major nutrients.",
                    &["Most vegetables like pH 6.0 to 7.0"],
                ),
            ],
            vec![quiz(
                "soil-basics-quiz",
                "Soil Basics Quiz",
                vec![
                    question(
                        1,
                        "Which particles determine soil texture?",
                        &["Sand, silt and clay", "Nitrogen and potassium", "Roots and stems"],
                        0,
                        "Texture is the proportion of sand, silt and clay.",
                    ),
                    question(
                        2,
                        "What pH range do most vegetables prefer?",
                        &["4.0 to 5.0", "6.0 to 7.0", "8.0 to 9.0"],
                        1,
                        "Slightly acidic to neutral soil suits most vegetables.",
                    ),
                ],
            )],
        ),
        module(
            "first-seeds",
            "Planting Your First Seeds",
            "Sowing depth, spacing and caring for seedlings.",
            "35 minutes",
            vec![
                lesson(
                    1,
                    "Sowing Depth",
                    "Plant seeds about two to three times as deep as they are wide. \
                     Tiny seeds such as lettuce only need a light dusting of compost. \
                     Firm the soil gently so seeds touch moisture.",
                    &["Sow two to three times the seed width"],
                ),
                lesson(
                    2,
                    "Caring for Seedlings",
                    "Seedlings need steady moisture and plenty of light. \
                     Thinning crowded rows gives the strongest plants room to grow. \
                     Harden off indoor seedlings before transplanting them outside.",
                    &["Thin crowded rows", "Harden off before transplanting"],
                ),
            ],
            vec![
                quiz(
                    "sowing-quiz",
                    "Sowing Quiz",
                    vec![question(
                        1,
                        "How deep should most seeds be planted?",
                        &["As deep as possible", "Two to three times their width", "On the surface"],
                        1,
                        "A depth of two to three times the seed width is the usual rule.",
                    )],
                ),
                quiz(
                    "seedling-quiz",
                    "Seedling Care Quiz",
                    vec![question(
                        1,
                        "What should you do before moving indoor seedlings outside?",
                        &["Prune them", "Harden them off", "Stop watering"],
                        1,
                        "Hardening off slowly adapts seedlings to outdoor conditions.",
                    )],
                ),
            ],
        ),
        module(
            "watering-wisely",
            "Watering Wisely",
            "When and how much to water.",
            "25 minutes",
            vec![lesson(
                1,
                "Deep Watering",
                "Water deeply and less often to encourage roots to grow downward. \
                 Morning watering reduces evaporation and fungal disease. \
                 Mulch keeps moisture in the soil between waterings.",
                &["Water deeply, less often", "Water in the morning"],
            )],
            vec![quiz(
                "watering-quiz",
                "Watering Quiz",
                vec![question(
                    1,
                    "When is the best time of day to water?",
                    &["Morning", "Midday", "Midnight"],
                    0,
                    "Morning watering loses less to evaporation and dries leaves by evening.",
                )],
            )],
        ),
    ]
}

fn intermediate() -> Vec<Module> {
    vec![
        module(
            "composting",
            "Composting",
            "Turning kitchen and garden waste into rich compost.",
            "40 minutes",
            vec![
                lesson(
                    1,
                    "Greens and Browns",
                    "Compost needs a balance of nitrogen-rich greens and carbon-rich browns. \
                     Grass clippings and vegetable scraps are greens. \
                     Dry leaves, straw and cardboard are browns.",
                    &["Balance greens and browns", "Roughly three parts browns to one part greens"],
                ),
                lesson(
                    2,
                    "Managing the Pile",
                    "Turning the pile adds oxygen and speeds decomposition. \
                     A healthy pile feels as damp as a wrung-out sponge. \
                     Finished compost smells earthy and crumbles easily.",
                    &["Turn for oxygen", "Keep it sponge-damp"],
                ),
            ],
            vec![quiz(
                "compost-quiz",
                "Composting Quiz",
                vec![
                    question(
                        1,
                        "Which of these is a brown material?",
                        &["Grass clippings", "Dry leaves", "Vegetable scraps"],
                        1,
                        "Dry leaves are carbon-rich browns.",
                    ),
                    question(
                        2,
                        "Why turn a compost pile?",
                        &["To add oxygen", "To cool it permanently", "To remove worms"],
                        0,
                        "Turning adds oxygen for the microbes doing the work.",
                    ),
                ],
            )],
        ),
        module(
            "companion-planting",
            "Companion Planting",
            "Plants that help each other grow.",
            "30 minutes",
            vec![lesson(
                1,
                "Helpful Pairings",
                "Beans fix nitrogen that neighbouring corn can use. \
                 Marigolds deter some soil pests around tomatoes. \
                 Tall crops can shade lettuce during hot summers.",
                &["Beans fix nitrogen", "Marigolds deter pests"],
            )],
            vec![quiz(
                "companion-quiz",
                "Companion Planting Quiz",
                vec![question(
                    1,
                    "Which plant fixes nitrogen in the soil?",
                    &["Beans", "Tomatoes", "Lettuce"],
                    0,
                    "Legumes like beans host nitrogen-fixing bacteria.",
                )],
            )],
        ),
        module(
            "pest-management",
            "Integrated Pest Management",
            "Keeping pests in check with minimal chemicals.",
            "45 minutes",
            vec![lesson(
                1,
                "Beneficial Insects",
                "Ladybirds and lacewings eat aphids. \
                 Flowering herbs attract predators that protect vegetables. \
                 Regular inspection catches problems before they spread.",
                &["Encourage predators", "Inspect plants weekly"],
            )],
            vec![quiz(
                "pest-quiz",
                "Pest Management Quiz",
                vec![question(
                    1,
                    "Which insect eats aphids?",
                    &["Ladybird", "Cabbage moth", "Slug"],
                    0,
                    "Ladybirds and their larvae are aphid predators.",
                )],
            )],
        ),
    ]
}

fn expert() -> Vec<Module> {
    vec![
        module(
            "permaculture-design",
            "Permaculture Design",
            "Designing self-sustaining garden systems.",
            "60 minutes",
            vec![
                lesson(
                    1,
                    "Zones and Sectors",
                    "Permaculture zones place the most visited elements closest to the house. \
                     Sector analysis maps sun, wind and water flowing across a site. \
                     Good placement saves energy for years.",
                    &["Zone 1 is visited daily", "Map sun, wind and water sectors"],
                ),
                lesson(
                    2,
                    "Guilds",
                    "A guild groups plants around a central tree so each supports the others. \
                     Nitrogen fixers, dynamic accumulators and ground covers fill distinct roles.",
                    &["Plants in a guild fill distinct roles"],
                ),
            ],
            vec![
                quiz(
                    "zones-quiz",
                    "Zones Quiz",
                    vec![question(
                        1,
                        "Which zone holds the elements visited most often?",
                        &["Zone 1", "Zone 3", "Zone 5"],
                        0,
                        "Zone 1 is nearest the house and visited daily.",
                    )],
                ),
                quiz(
                    "guilds-quiz",
                    "Guilds Quiz",
                    vec![question(
                        1,
                        "What sits at the centre of a typical guild?",
                        &["A pond", "A tree", "A compost bin"],
                        1,
                        "Guilds are usually built around a central fruit or nut tree.",
                    )],
                ),
            ],
        ),
        module(
            "greenhouse-climate",
            "Greenhouse Climate Control",
            "Managing heat, humidity and airflow under glass.",
            "50 minutes",
            vec![lesson(
                1,
                "Ventilation",
                "Ridge and side vents create airflow that removes excess heat. \
                 High humidity without airflow invites botrytis and mildew. \
                 Shade cloth lowers midsummer temperatures.",
                &["Vent to remove heat", "Airflow prevents mildew"],
            )],
            vec![quiz(
                "greenhouse-quiz",
                "Greenhouse Quiz",
                vec![question(
                    1,
                    "What does stagnant humid air encourage?",
                    &["Fungal disease", "Faster fruiting", "Deeper roots"],
                    0,
                    "Botrytis and mildew thrive in still, humid air.",
                )],
            )],
        ),
        module(
            "seed-saving",
            "Seed Saving and Plant Breeding",
            "Keeping varieties true and selecting for traits.",
            "55 minutes",
            vec![lesson(
                1,
                "Isolation Distances",
                "Cross-pollinating crops need isolation to keep varieties true. \
                 Self-pollinating tomatoes and beans are easiest for beginners. \
                 Select seed from the healthiest, most productive plants.",
                &["Isolate cross-pollinators", "Save from the best plants"],
            )],
            vec![quiz(
                "seed-saving-quiz",
                "Seed Saving Quiz",
                vec![question(
                    1,
                    "Which crop is easiest for a first seed-saving attempt?",
                    &["Squash", "Tomato", "Corn"],
                    1,
                    "Tomatoes mostly self-pollinate, so seed stays true to type.",
                )],
            )],
        ),
    ]
}
