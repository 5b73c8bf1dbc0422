use super::{GateDef, InfoPointDef};

fn terminal(id: &str, floor: u32, (x, y): (i32, i32), title: &str, lines: &[&str]) -> InfoPointDef {
    InfoPointDef {
        id: id.to_string(),
        floor,
        x,
        y,
        title: title.to_string(),
        content: lines.iter().map(|line| line.to_string()).collect(),
    }
}

pub fn builtin_info_points() -> Vec<InfoPointDef> {
    vec![
        terminal(
            "big_o_hint",
            1,
            (8, 8),
            "Big-O Notation Guide",
            &[
                "Big-O notation describes the upper bound of algorithm complexity.",
                "Common complexities from fastest to slowest:",
                "O(1) - Constant: Array access, hash lookup",
                "O(log n) - Logarithmic: Binary search, balanced trees",
                "O(n) - Linear: Array traversal, linear search",
                "O(n log n) - Linearithmic: Efficient sorting (merge, heap)",
                "O(n²) - Quadratic: Nested loops, bubble sort",
                "O(2^n) - Exponential: Recursive fibonacci, subset generation",
            ],
        ),
        terminal(
            "lore_layer1",
            1,
            (12, 10),
            "Welcome to the Neural Network",
            &[
                "You have entered the first layer of the vast neural substrate.",
                "This network was built by the Architects to store and process",
                "all computational knowledge. But something has gone wrong.",
                "The knowledge modules are fragmenting. The NPCs you encounter",
                "are memory fragments - they guard pieces of understanding.",
                "Your coherence represents your ability to maintain stability",
                "in this digital realm. Lose it all, and you'll be ejected.",
            ],
        ),
        terminal(
            "data_structures",
            2,
            (8, 8),
            "Data Structure Cheat Sheet",
            &[
                "Arrays: O(1) access, O(n) insert/delete",
                "Linked Lists: O(n) access, O(1) insert/delete at ends",
                "Hash Tables: O(1) avg access/insert, O(n) worst case",
                "Binary Search Trees: O(log n) avg, O(n) worst (unbalanced)",
                "Heaps: O(1) find-min, O(log n) insert/delete",
                "Try to match the data structure to your access patterns!",
            ],
        ),
        terminal(
            "tcp_hint",
            2,
            (12, 10),
            "Networking Fundamentals",
            &[
                "TCP (Transmission Control Protocol) is connection-oriented.",
                "Three-way handshake: SYN -> SYN-ACK -> ACK",
                "UDP is connectionless - faster but unreliable.",
                "Remember: TCP trades speed for reliability!",
                "HTTP runs on TCP port 80, HTTPS on 443.",
            ],
        ),
        terminal(
            "lore_layer2",
            2,
            (8, 12),
            "The Middle Layers",
            &[
                "As you descend deeper into the network, the questions become",
                "harder and the guardians more demanding. The middle layers",
                "contain more specialized knowledge - systems, networking,",
                "and compiler theory.",
                "The Virus Hunter patrols the deepest layer. It believes all",
                "data runners are threats to the network's integrity.",
            ],
        ),
        terminal(
            "concurrency_hint",
            3,
            (8, 8),
            "Concurrency Concepts",
            &[
                "Deadlock requires 4 conditions (Coffman conditions):",
                "1. Mutual Exclusion - resources can't be shared",
                "2. Hold and Wait - holding resources while waiting",
                "3. No Preemption - resources can't be forcibly taken",
                "4. Circular Wait - circular chain of waiting processes",
                "Break ANY one condition to prevent deadlock!",
            ],
        ),
    ]
}

pub fn builtin_gates() -> Vec<GateDef> {
    [(1, 35, 12, "binary_search"), (2, 20, 10, "hashing"), (2, 35, 15, "trees")]
        .into_iter()
        .map(|(floor, x, y, knowledge)| GateDef {
            floor,
            x,
            y,
            required_knowledge: knowledge.to_string(),
        })
        .collect()
}
