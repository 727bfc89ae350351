//! Bundled catalog
//!
//! Offline data used by the mock source and for monster lookups.

use super::models::{
    Composition, Counter, Defense, Difficulty, Element, LeaderSkill, Monster, MonsterCounter,
    TrendingDefense,
};

// == Roster ==
const ROSTER: &[(&str, &str, Element)] = &[
    ("susano", "Susano", Element::Water),
    ("garo", "Garo", Element::Fire),
    ("orion", "Orion", Element::Wind),
    ("harmonia", "Harmonia", Element::Light),
    ("vigor", "Vigor", Element::Water),
    ("skogul", "Skogul", Element::Dark),
    ("triana", "Triana", Element::Water),
    ("elucia", "Elucia", Element::Water),
    ("suiki", "Suiki", Element::Water),
    ("windy", "Windy", Element::Wind),
    ("sian", "Sian", Element::Wind),
    ("fran", "Fran", Element::Water),
    ("malaka", "Malaka", Element::Fire),
    ("betta", "Betta", Element::Water),
    ("sabrina", "Sabrina", Element::Water),
    ("talia", "Talia", Element::Fire),
    ("galleon", "Galleon", Element::Water),
    ("julie", "Julie", Element::Water),
    ("groggo", "Groggo", Element::Wind),
    ("chloe", "Chloe", Element::Fire),
    ("khmun", "Khmun", Element::Light),
    ("mina", "Mina", Element::Fire),
    ("konamiya", "Konamiya", Element::Water),
    ("aegir", "Aegir", Element::Fire),
    ("miho", "Miho", Element::Wind),
    ("tetra", "Tetra", Element::Water),
    ("yen", "Yen", Element::Dark),
    ("emma", "Emma", Element::Water),
    ("raviti", "Raviti", Element::Light),
    ("tractor", "Tractor", Element::Fire),
    ("stella", "Stella", Element::Fire),
    ("bernard", "Bernard", Element::Wind),
    ("orochi", "Orochi", Element::Wind),
    ("dias", "Dias", Element::Light),
    ("chasun", "Chasun", Element::Wind),
    ("darion", "Darion", Element::Light),
    ("lulu", "Lulu", Element::Water),
    ("hraesvelg", "Hraesvelg", Element::Wind),
];

pub fn monsters() -> Vec<Monster> {
    ROSTER
        .iter()
        .map(|(id, name, element)| Monster::new(id, name, *element))
        .collect()
}

/// Case-insensitive substring match on name or id. An empty query matches all.
pub fn search_monsters(query: &str) -> Vec<Monster> {
    let needle = query.trim().to_lowercase();
    monsters()
        .into_iter()
        .filter(|m| m.name.to_lowercase().contains(&needle) || m.id.contains(&needle))
        .collect()
}

pub fn get_monster(id: &str) -> Option<Monster> {
    let id = id.trim().to_lowercase();
    monsters().into_iter().find(|m| m.id == id)
}

// == Defenses ==
/// Known defenses for the given monster ids. Only Susano/Garo/Orion is bundled.
pub fn search_defenses(ids: &[String]) -> Vec<Defense> {
    let ids: Vec<String> = ids.iter().map(|id| id.trim().to_lowercase()).collect();
    let has = |wanted: &str| ids.iter().any(|id| id == wanted);

    if has("susano") && has("garo") && has("orion") {
        vec![sample_defense()]
    } else {
        Vec::new()
    }
}

fn trio(a: &str, b: &str, c: &str) -> [String; 3] {
    [a.to_string(), b.to_string(), c.to_string()]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn leader(description: &str, bonus: &str) -> LeaderSkill {
    LeaderSkill {
        description: description.to_string(),
        bonus: bonus.to_string(),
    }
}

struct CounterSeed {
    id: &'static str,
    monsters: [&'static str; 3],
    leader: (&'static str, &'static str),
    strengths: &'static [&'static str],
    notes: &'static [&'static str],
    rating: f64,
    votes: u32,
    author: &'static str,
    date: &'static str,
    strategy: &'static str,
}

const SAMPLE_COUNTERS: &[CounterSeed] = &[
    CounterSeed {
        id: "counter-1",
        monsters: ["harmonia", "vigor", "skogul"],
        leader: ("Increases the HP of ally monsters in Guild content by 33%", "HP +33%"),
        strengths: &["Sturdy tank", "Consistent damage"],
        notes: &[],
        rating: 5.0,
        votes: 7,
        author: "free2pgod",
        date: "30/01/2023",
        strategy: "Tank composition with consistent damage",
    },
    CounterSeed {
        id: "counter-2",
        monsters: ["triana", "elucia", "suiki"],
        leader: ("Increases the Defense of ally monsters in Guild content by 33%", "Defense +33%"),
        strengths: &["Sturdy support", "Heals"],
        notes: &["Any good water damage dealer works in place of Suiki"],
        rating: 5.0,
        votes: 2,
        author: "Roger924",
        date: "24/06/2025",
        strategy: "Support with water damage dealers",
    },
    CounterSeed {
        id: "counter-3",
        monsters: ["vigor", "windy", "sian"],
        leader: ("Increases the Attack Power of ally monsters in Guild content by 21%", "Attack Power +21%"),
        strengths: &["High damage", "Control"],
        notes: &["Garo will focus Windy, build her ultra tanky (3x HP)"],
        rating: 5.0,
        votes: 1,
        author: "Aonun",
        date: "12/08/2023",
        strategy: "Ez clap. Garo focuses Windy, so build her ultra tanky (3 HP sets) to shield the team. Vigor kills Garo, Sian bombs the team without immunity (T2)",
    },
    CounterSeed {
        id: "counter-4",
        monsters: ["sabrina", "triana", "talia"],
        leader: ("Increases the Accuracy of ally monsters in Guild content by 40%", "Accuracy +40%"),
        strengths: &["Twin damage", "Support"],
        notes: &["Garo - Susano - Orion"],
        rating: 4.4,
        votes: 5,
        author: "sparklefresh",
        date: "10/03/2020",
        strategy: "Twins composition for consistent damage",
    },
    CounterSeed {
        id: "counter-5",
        monsters: ["galleon", "malaka", "triana"],
        leader: ("Increases the Attack Speed of ally monsters in Guild content by 24%", "Attack Speed +24%"),
        strengths: &["Speed", "Control"],
        notes: &["Shield Will Galleon, Malaka on Shield, Triana on Will"],
        rating: 3.9,
        votes: 7,
        author: "Kappa84",
        date: "10/03/2020",
        strategy: "Shield Will with Galleon first, Malaka second and Triana third",
    },
];

impl CounterSeed {
    fn build(&self) -> Counter {
        let [a, b, c] = self.monsters;
        Counter {
            id: self.id.to_string(),
            composition: Composition {
                id: format!("comp-{}-{}-{}", a, b, c),
                monsters: trio(a, b, c),
                leader_skill: leader(self.leader.0, self.leader.1),
                strengths: strings(self.strengths),
                weaknesses: Vec::new(),
                notes: strings(self.notes),
            },
            rating: self.rating,
            votes: self.votes,
            author: self.author.to_string(),
            date: self.date.to_string(),
            strategy: self.strategy.to_string(),
            build_notes: None,
        }
    }
}

/// Susano/Garo/Orion with its five community counters.
pub fn sample_defense() -> Defense {
    Defense {
        id: "def-susano-garo-orion".to_string(),
        composition: Composition {
            id: "comp-susano-garo-orion".to_string(),
            monsters: trio("susano", "garo", "orion"),
            leader_skill: leader(
                "Increases the Attack Speed of ally Water monsters by 30%",
                "Attack Speed +30%",
            ),
            strengths: strings(&[
                "Speed leader",
                "Orion with RNG",
                "Garo/Susano passives",
                "Hard to outspeed",
            ]),
            weaknesses: strings(&[
                "Vulnerable to Turn 2 compositions (Shield Will)",
                "Weak against double water + wind",
                "Weak against twins",
            ]),
            notes: strings(&[
                "Shield Will Galleon Julie + 1 fire tank",
                "Shield Will water twins + Triana",
                "Double water + Fire on Will etc.",
            ]),
        },
        counters: SAMPLE_COUNTERS.iter().map(CounterSeed::build).collect(),
    }
}

// == Trending ==
pub fn trending_defenses() -> Vec<TrendingDefense> {
    let entry = |id: &str, monsters: [String; 3], rating: f64, uses: u32| TrendingDefense {
        id: id.to_string(),
        name: monsters.join(", "),
        monsters,
        rating,
        uses,
        trending: true,
    };

    vec![
        entry("trending_1", trio("Susano", "Garo", "Orion"), 8.9, 3450),
        entry("trending_2", trio("Vanessa", "Rakan", "Anavel"), 8.7, 2890),
        entry("trending_3", trio("Woosa", "Hathor", "Okeanos"), 8.5, 2100),
    ]
}

/// Counters known to work against `_name`, best rated first.
pub fn monster_counters(_name: &str) -> Vec<MonsterCounter> {
    let mut counters = vec![
        MonsterCounter {
            id: "counter_m1".to_string(),
            monsters: trio("Lushen", "Galleon", "Taor"),
            rating: 9.2,
            strategy: "Speed clear with Lushen".to_string(),
            difficulty: Difficulty::Easy,
            votes: 342,
            trending: true,
        },
        MonsterCounter {
            id: "counter_m2".to_string(),
            monsters: trio("Verad", "Woosa", "Anavel"),
            rating: 8.1,
            strategy: "Control with freeze".to_string(),
            difficulty: Difficulty::Medium,
            votes: 215,
            trending: false,
        },
    ];
    counters.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    counters
}
