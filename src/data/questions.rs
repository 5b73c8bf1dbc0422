use std::collections::BTreeMap;

use crate::conversation::{Answer, Question};

type AnswerRow<'a> = (&'a str, bool, &'a str, Option<&'a str>);

fn question(text: &str, topic: &str, rows: [AnswerRow<'_>; 4]) -> Question {
    Question {
        text: text.to_string(),
        topic: topic.to_string(),
        answers: rows
            .into_iter()
            .map(|(text, correct, response, reward)| {
                let answer = Answer::new(text, correct, response);
                match reward {
                    Some(token) => answer.rewarding(token),
                    None => answer,
                }
            })
            .collect(),
    }
}

/// The built-in question bank, keyed by question id.
pub fn builtin_questions() -> BTreeMap<String, Question> {
    let bank = [
        (
            "big_o",
            question(
                "What is the time complexity of binary search on a sorted array?",
                "algorithms",
                [
                    ("O(n)", false, "Not quite. Binary search eliminates half the search space each step.", None),
                    ("O(log n)", true, "Correct! Each comparison halves the search space.", Some("binary_search")),
                    ("O(n log n)", false, "That's typical for comparison sorts, not binary search.", None),
                    ("O(1)", false, "Only if you're incredibly lucky on the first try!", None),
                ],
            ),
        ),
        (
            "hash_table",
            question(
                "What is the average-case time complexity for hash table lookups?",
                "data_structures",
                [
                    ("O(n)", false, "That would be the worst case with many collisions.", None),
                    ("O(log n)", false, "That's for balanced trees, not hash tables.", None),
                    ("O(1)", true, "Excellent! Hash tables provide constant-time average-case lookup.", Some("hashing")),
                    ("O(n²)", false, "Way too slow! Hash tables are much more efficient.", None),
                ],
            ),
        ),
        (
            "tree_height",
            question(
                "In a balanced binary search tree with n nodes, what is the height?",
                "data_structures",
                [
                    ("O(n)", false, "That's an unbalanced tree - basically a linked list.", None),
                    ("O(log n)", true, "Perfect! Balanced trees maintain logarithmic height.", Some("trees")),
                    ("O(√n)", false, "Interesting guess, but not quite right.", None),
                    ("O(1)", false, "The height must grow as we add more nodes.", None),
                ],
            ),
        ),
        (
            "heap_operations",
            question(
                "In a binary heap, what is the time complexity to extract the minimum element?",
                "data_structures",
                [
                    ("O(1)", false, "Finding the min is O(1), but extraction requires reheapifying.", None),
                    ("O(log n)", true, "Correct! We remove the root and bubble down to maintain heap property.", Some("heaps")),
                    ("O(n)", false, "That would be too slow for a heap. Heaps are efficient!", None),
                    ("O(n log n)", false, "That's typical for sorting, not a single heap operation.", None),
                ],
            ),
        ),
        (
            "dp_memoization",
            question(
                "What is the key difference between memoization and tabulation in dynamic programming?",
                "algorithms",
                [
                    ("Memoization is iterative, tabulation is recursive", false, "Actually it's the opposite! Memoization uses recursion with caching.", None),
                    ("Memoization is top-down (recursive), tabulation is bottom-up (iterative)", true, "Correct! Memoization caches recursive calls, tabulation builds solutions iteratively.", Some("dynamic_programming")),
                    ("They are the same thing, just different names", false, "They're both DP techniques but with different approaches.", None),
                    ("Memoization is for graphs, tabulation is for strings", false, "Both can be used for any DP problem, regardless of data type.", None),
                ],
            ),
        ),
        (
            "quicksort",
            question(
                "What is the average-case time complexity of Quicksort?",
                "algorithms",
                [
                    ("O(n²)", false, "That's the worst case with bad pivots. Average case is better!", None),
                    ("O(n log n)", true, "Correct! With good pivots, we divide-and-conquer efficiently.", Some("sorting")),
                    ("O(n)", false, "Only possible for special cases like counting sort.", None),
                    ("O(log n)", false, "We still need to touch every element at least once.", None),
                ],
            ),
        ),
        (
            "tcp_handshake",
            question(
                "In TCP's three-way handshake, what is the correct sequence?",
                "networking",
                [
                    ("SYN, ACK, FIN", false, "FIN is for closing, not establishing connections.", None),
                    ("SYN, SYN-ACK, ACK", true, "Perfect! This establishes a reliable TCP connection.", Some("networking")),
                    ("ACK, SYN, ACK", false, "You can't ACK before SYN - no connection exists yet!", None),
                    ("SYN, SYN, ACK", false, "The server responds with SYN-ACK, not just SYN.", None),
                ],
            ),
        ),
        (
            "http_methods",
            question(
                "Which HTTP method is idempotent and safe (no side effects)?",
                "networking",
                [
                    ("POST", false, "POST creates resources and has side effects - not safe or idempotent.", None),
                    ("GET", true, "Correct! GET retrieves data without modifying state - both safe and idempotent.", Some("http")),
                    ("PUT", false, "PUT is idempotent but not safe - it modifies resources.", None),
                    ("DELETE", false, "DELETE is idempotent but not safe - it removes resources.", None),
                ],
            ),
        ),
        (
            "dns_resolution",
            question(
                "What is the purpose of DNS caching?",
                "networking",
                [
                    ("To encrypt DNS queries", false, "That's DNSSEC or DNS-over-HTTPS, not caching.", None),
                    ("To reduce latency and load on DNS servers", true, "Correct! Caching means we don't need to query authoritative servers every time.", Some("dns")),
                    ("To prevent DNS spoofing attacks", false, "Caching can actually make spoofing easier if cache is poisoned!", None),
                    ("To assign IP addresses to new domains", false, "That's domain registration, not caching.", None),
                ],
            ),
        ),
        (
            "encryption_types",
            question(
                "What's the key advantage of asymmetric encryption over symmetric?",
                "security",
                [
                    ("It's faster to compute", false, "Actually asymmetric encryption is much slower than symmetric!", None),
                    ("It requires shorter keys", false, "Asymmetric keys are typically much longer (2048-4096 bits vs 128-256).", None),
                    ("You can share public keys without compromising security", true, "Correct! No need to securely exchange keys - the public key can be public!", Some("cryptography")),
                    ("It provides better confidentiality", false, "Both provide confidentiality; the key difference is key distribution.", None),
                ],
            ),
        ),
        (
            "password_hashing",
            question(
                "Why should you use bcrypt/Argon2 instead of SHA-256 for password hashing?",
                "security",
                [
                    ("SHA-256 is too slow", false, "Actually SHA-256 is too FAST - attackers can brute force quickly!", None),
                    ("Bcrypt/Argon2 are intentionally slow and include salt", true, "Correct! Slow hashing + salt makes brute force attacks impractical.", Some("password_security")),
                    ("SHA-256 doesn't produce a hash", false, "SHA-256 does hash, but it's designed for speed, not password storage.", None),
                    ("Bcrypt works with quantum computers", false, "That's not the key advantage - it's about being computationally expensive.", None),
                ],
            ),
        ),
        (
            "tls_handshake",
            question(
                "During TLS handshake, what does the server send in the certificate?",
                "security",
                [
                    ("The server's private key", false, "Never! Private keys must stay private. Only the public key is shared.", None),
                    ("The server's public key signed by a Certificate Authority", true, "Correct! The CA signature proves the public key belongs to the claimed server.", Some("tls_ssl")),
                    ("The symmetric session key", false, "The session key is negotiated after certificate verification.", None),
                    ("The client's public key", false, "The server sends its own certificate, not the client's.", None),
                ],
            ),
        ),
        (
            "ipc_methods",
            question(
                "Which IPC method allows processes to share memory without copying data?",
                "systems",
                [
                    ("Pipes", false, "Pipes copy data through kernel buffers - not true memory sharing.", None),
                    ("Sockets", false, "Sockets also copy data, even on the same machine.", None),
                    ("Shared memory", true, "Correct! Processes map the same physical memory pages into their address space.", Some("ipc")),
                    ("Message queues", false, "Message queues copy data between processes.", None),
                ],
            ),
        ),
        (
            "inodes",
            question(
                "What does an inode in a Unix filesystem store?",
                "systems",
                [
                    ("The file name and directory structure", false, "File names are stored in directory entries, not inodes!", None),
                    ("File metadata (permissions, timestamps, pointers to data blocks)", true, "Correct! Inodes store everything about a file except its name and data.", Some("filesystems")),
                    ("Only the file size", false, "Inodes store much more: permissions, owner, timestamps, block pointers...", None),
                    ("The actual file contents", false, "Contents are in data blocks; inodes point to those blocks.", None),
                ],
            ),
        ),
        (
            "compiler_phases",
            question(
                "Which compiler phase comes immediately after lexical analysis?",
                "compilers",
                [
                    ("Code generation", false, "Code generation is near the end of compilation.", None),
                    ("Optimization", false, "Optimization happens after semantic analysis.", None),
                    ("Parsing (syntax analysis)", true, "Correct! Parsing builds the syntax tree from tokens.", Some("compilers")),
                    ("Semantic analysis", false, "Semantic analysis comes after parsing.", None),
                ],
            ),
        ),
        (
            "acid",
            question(
                "In database ACID properties, what does the 'I' stand for?",
                "databases",
                [
                    ("Integrity", false, "Close, but that's not the official term.", None),
                    ("Isolation", true, "Yes! Isolation ensures concurrent transactions don't interfere.", Some("databases")),
                    ("Indexing", false, "Indexing is important but not part of ACID.", None),
                    ("Idempotency", false, "That's a different concept.", None),
                ],
            ),
        ),
        (
            "deadlock",
            question(
                "Which is NOT a necessary condition for deadlock?",
                "systems",
                [
                    ("Mutual exclusion", false, "Mutual exclusion IS required for deadlock.", None),
                    ("Hold and wait", false, "Hold and wait IS a deadlock condition.", None),
                    ("Preemption", true, "Correct! NO preemption is required. If resources can be preempted, deadlock can be avoided.", Some("concurrency")),
                    ("Circular wait", false, "Circular wait IS a necessary condition.", None),
                ],
            ),
        ),
        (
            "cache",
            question(
                "In a cache with LRU replacement, what happens on a cache miss?",
                "systems",
                [
                    ("Random page evicted", false, "LRU is not random - it's based on recency.", None),
                    ("Oldest page evicted", false, "It's not about absolute age, but recent use.", None),
                    ("Least recently used evicted", true, "Yes! LRU evicts the page with the oldest last access time.", Some("caching")),
                    ("Most recently used evicted", false, "That would be MRU, the opposite of LRU!", None),
                ],
            ),
        ),
        (
            "message_queues",
            question(
                "What's a key advantage of message queues over direct RPC calls?",
                "distributed_systems",
                [
                    ("They're faster than RPC", false, "Message queues actually add latency due to buffering.", None),
                    ("Decoupling and asynchronous processing", true, "Correct! Producers and consumers don't need to be online simultaneously.", Some("message_queues")),
                    ("They guarantee exactly-once delivery", false, "Most queues provide at-least-once; exactly-once is very hard!", None),
                    ("They eliminate the need for error handling", false, "You still need error handling - failures can happen anywhere!", None),
                ],
            ),
        ),
        (
            "cap_theorem",
            question(
                "In CAP theorem, what does 'partition tolerance' mean?",
                "distributed_systems",
                [
                    ("The system can split data across multiple partitions", false, "That's sharding, not partition tolerance!", None),
                    ("The system continues operating despite network failures between nodes", true, "Correct! P means the system works even when nodes can't communicate.", Some("distributed_systems")),
                    ("The system tolerates disk partition failures", false, "CAP is about network partitions, not disk partitions.", None),
                    ("You can partition your database for better performance", false, "That's horizontal scaling, not partition tolerance.", None),
                ],
            ),
        ),
        (
            "cpu_pipelining",
            question(
                "What problem does branch prediction solve in CPU pipelining?",
                "architecture",
                [
                    ("It prevents race conditions", false, "That's about concurrency, not pipeline efficiency.", None),
                    ("It reduces pipeline stalls from conditional branches", true, "Correct! By guessing which branch to take, we keep the pipeline full.", Some("cpu_architecture")),
                    ("It increases clock speed", false, "Branch prediction doesn't change clock speed, it improves throughput.", None),
                    ("It adds more cores to the CPU", false, "That's multi-core architecture, not branch prediction.", None),
                ],
            ),
        ),
        (
            "gpu_vs_cpu",
            question(
                "Why are GPUs better than CPUs for training neural networks?",
                "architecture",
                [
                    ("GPUs have higher clock speeds", false, "Actually CPU cores typically run faster than GPU cores!", None),
                    ("GPUs excel at parallel matrix operations", true, "Correct! Thousands of cores can process matrix multiplications simultaneously.", Some("gpu_computing")),
                    ("GPUs have more RAM", false, "System RAM is typically much larger than GPU memory.", None),
                    ("GPUs are better at branch prediction", false, "GPUs actually have simpler control flow - CPUs are better at branching.", None),
                ],
            ),
        ),
        (
            "halting_problem",
            question(
                "What does the halting problem prove?",
                "theory",
                [
                    ("Some programs will always crash", false, "It's not about crashes, it's about decidability.", None),
                    ("No algorithm can determine if arbitrary programs halt for all inputs", true, "Correct! This is a fundamental limit of computation - undecidability exists.", Some("computability_theory")),
                    ("All Turing machines eventually halt", false, "Many Turing machines loop forever - that's the whole point!", None),
                    ("P = NP", false, "The halting problem is about decidability, not complexity classes.", None),
                ],
            ),
        ),
        (
            "p_vs_np",
            question(
                "What would it mean if P = NP?",
                "theory",
                [
                    ("Sorting would be O(1)", false, "No, that's not related to P vs NP.", None),
                    ("Every efficiently verifiable problem would be efficiently solvable", true, "Correct! This would revolutionize computer science.", Some("complexity_theory")),
                    ("Turing machines would be obsolete", false, "P vs NP doesn't affect the model of computation.", None),
                    ("Only applies to quantum computers", false, "P and NP are classical complexity classes.", None),
                ],
            ),
        ),
        (
            "backpropagation",
            question(
                "What is backpropagation in neural networks?",
                "ai_ml",
                [
                    ("Running the network in reverse to generate outputs", false, "That's not quite right - it's about learning, not inference.", None),
                    ("Computing gradients by applying chain rule from output to input", true, "Correct! We propagate error gradients backward to update weights.", Some("neural_networks")),
                    ("Adding more layers to make the network deeper", false, "That's network architecture, not the training algorithm.", None),
                    ("Removing neurons that don't contribute to accuracy", false, "That's pruning, not backpropagation.", None),
                ],
            ),
        ),
        (
            "overfitting",
            question(
                "What does it mean when a model overfits the training data?",
                "ai_ml",
                [
                    ("The model is too simple to capture patterns", false, "That's underfitting! Overfitting is the opposite problem.", None),
                    ("The model memorizes training data but fails to generalize", true, "Correct! High training accuracy but poor test performance indicates overfitting.", Some("machine_learning")),
                    ("The model trains too quickly", false, "Training speed doesn't directly cause overfitting.", None),
                    ("The model has perfect accuracy on both train and test sets", false, "That would be ideal! Overfitting shows a gap between train and test performance.", None),
                ],
            ),
        ),
    ];

    bank.into_iter()
        .map(|(id, question)| (id.to_string(), question))
        .collect()
}
