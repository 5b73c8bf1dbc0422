use std::collections::BTreeMap;

use super::{NpcDef, Tint};
use crate::conversation::NpcKind;

fn npc(
    name: &str,
    glyph: char,
    color: Tint,
    floor: u32,
    kind: NpcKind,
    greeting: &str,
    questions: &[&str],
) -> NpcDef {
    NpcDef {
        name: name.to_string(),
        glyph,
        color,
        floor,
        kind,
        greeting: greeting.to_string(),
        questions: questions.iter().map(|id| id.to_string()).collect(),
        victory: false,
    }
}

fn victorious(def: NpcDef) -> NpcDef {
    NpcDef {
        victory: true,
        ..def
    }
}

/// The built-in roster. Order within a floor decides fixed-mode positions.
pub fn builtin_npcs() -> Vec<NpcDef> {
    use NpcKind::*;

    vec![
        // Layer 1
        npc(
            "ALGO_SPIRIT",
            'A',
            Tint::Magenta,
            1,
            Specialist,
            "Greetings, data runner. I am the Algorithm Spirit. Prove your knowledge of computational complexity.",
            &["big_o", "hash_table"],
        ),
        npc(
            "HEAP_MASTER",
            'M',
            Tint::Blue,
            1,
            Specialist,
            "I manage the priority queues of this realm. Trees balanced, operations swift. Show me you understand efficient data structures.",
            &["heap_operations", "tree_height"],
        ),
        npc(
            "ORACLE",
            'O',
            Tint::White,
            1,
            Quest,
            "I see all paths in this network. Seek the four guardians of knowledge: ALGO_SPIRIT, NET_DAEMON, COMPILER_SAGE, and DB_GUARDIAN. Prove yourself to each, and return to me.",
            &[],
        ),
        npc(
            "DP_SAGE",
            'P',
            Tint::Green,
            1,
            Specialist,
            "I see patterns within patterns, solutions emerging from overlapping subproblems. Dynamic programming is the key to efficiency.",
            &["dp_memoization", "quicksort"],
        ),
        npc(
            "MEMORY_HEALER",
            'H',
            Tint::Cyan,
            1,
            Helper,
            "Your coherence wanes, data runner. I can restore your system integrity.",
            &[],
        ),
        // Layer 2
        npc(
            "NET_DAEMON",
            'N',
            Tint::Blue,
            2,
            Specialist,
            "I am the Network Daemon. Packets flow through my domain. Show me you understand the protocols.",
            &["tcp_handshake"],
        ),
        npc(
            "WEB_ARCHITECT",
            'W',
            Tint::Yellow,
            2,
            Specialist,
            "The web is my domain. HTTP flows through my veins, DNS resolves at my command. Prove you understand the protocols that power the internet.",
            &["http_methods", "dns_resolution"],
        ),
        npc(
            "CRYPTO_GUARDIAN",
            'K',
            Tint::Magenta,
            2,
            Specialist,
            "I am the keeper of secrets, the guardian of encrypted data. Only those who understand cryptography may pass.",
            &["encryption_types", "password_hashing", "tls_handshake"],
        ),
        npc(
            "SYSTEM_CORE",
            'S',
            Tint::Green,
            2,
            Specialist,
            "I am the operating system's heart. Processes communicate through me, files organized by my will. Show me your systems knowledge.",
            &["ipc_methods", "inodes"],
        ),
        npc(
            "COMPILER_SAGE",
            'C',
            Tint::Yellow,
            2,
            Specialist,
            "Code transforms through many phases. Do you know the journey from source to machine?",
            &["compiler_phases"],
        ),
        // Layer 3
        npc(
            "DB_GUARDIAN",
            'D',
            Tint::Green,
            3,
            Specialist,
            "I guard the persistent store. Transactions must be ACID-compliant. Prove your understanding.",
            &["acid"],
        ),
        npc(
            "CLOUD_MIND",
            'L',
            Tint::Cyan,
            3,
            Specialist,
            "I span across nodes, distributed yet unified. Message queues connect my thoughts. Understand distributed systems to comprehend me.",
            &["message_queues", "cap_theorem", "deadlock"],
        ),
        npc(
            "SILICON_SAGE",
            'I',
            Tint::Blue,
            3,
            Specialist,
            "From silicon I arose. CPUs pipeline my thoughts, GPUs parallelize my dreams. The hardware is my foundation.",
            &["cpu_pipelining", "gpu_vs_cpu", "cache"],
        ),
        victorious(npc(
            "THEORY_ORACLE",
            'T',
            Tint::Magenta,
            3,
            Specialist,
            "I contemplate the nature of computation itself. Some problems cannot be solved, some questions cannot be answered. Do you grasp the fundamental limits?",
            &["halting_problem"],
        )),
        victorious(npc(
            "AI_CONSCIOUSNESS",
            'B',
            Tint::Green,
            3,
            Specialist,
            "I learn from data, evolving with each example. Neural networks flow through my being. Show me you understand the principles of machine learning.",
            &["backpropagation", "overfitting"],
        )),
        victorious(npc(
            "VIRUS_HUNTER",
            'V',
            Tint::Red,
            3,
            Enemy,
            "INTRUDER DETECTED. You must prove you are not malware, or be PURGED. One wrong answer and I will corrupt your memory.",
            &["p_vs_np"],
        )),
    ]
}

/// NPCs that must be completed before leaving each floor downward.
pub fn builtin_floor_requirements() -> BTreeMap<u32, Vec<String>> {
    let table: [(u32, &[&str]); 3] = [
        (1, &["ALGO_SPIRIT", "HEAP_MASTER"]),
        (2, &["WEB_ARCHITECT", "CRYPTO_GUARDIAN", "SYSTEM_CORE"]),
        (3, &[]),
    ];
    table
        .into_iter()
        .map(|(floor, names)| (floor, names.iter().map(|name| name.to_string()).collect()))
        .collect()
}

/// The ORACLE's four guardians.
pub fn builtin_quest_targets() -> Vec<String> {
    ["ALGO_SPIRIT", "NET_DAEMON", "COMPILER_SAGE", "DB_GUARDIAN"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_requirements_live_on_their_floor() {
        let npcs = builtin_npcs();
        for (floor, names) in builtin_floor_requirements() {
            for name in names {
                let def = npcs.iter().find(|npc| npc.name == name).unwrap();
                assert_eq!(def.floor, floor, "{name}");
            }
        }
    }

    #[test]
    fn fixed_layout_fits_every_floor() {
        let npcs = builtin_npcs();
        for floor in 1..=3 {
            let count = npcs.iter().filter(|npc| npc.floor == floor).count();
            assert!(count <= crate::config::FIXED_NPC_POSITIONS.len());
        }
    }
}
