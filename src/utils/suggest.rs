//! "Did you mean" candidates for mistyped tool names and enum values.

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }
    let m = b.chars().count();
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0; m + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }
    prev[m]
}

fn score(input: &str, candidate: &str) -> usize {
    let a = normalize(input);
    let b = normalize(candidate);
    if a.is_empty() || b.is_empty() {
        return usize::MAX;
    }
    if a == b {
        return 0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 1;
    }
    levenshtein(&a, &b)
}

fn max_distance(input: &str) -> usize {
    match normalize(input).len() {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        n => (n as f32 * 0.35).floor().max(3.0) as usize,
    }
}

pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    if input.trim().is_empty() || candidates.is_empty() {
        return Vec::new();
    }
    let allowed = max_distance(input);
    let mut scored: Vec<(&String, usize)> = candidates
        .iter()
        .map(|candidate| (candidate, score(input, candidate)))
        .filter(|(_, s)| *s <= allowed)
        .collect();
    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.len().cmp(&b.0.len()))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut out: Vec<String> = Vec::new();
    for (candidate, _) in scored {
        if !out.contains(candidate) {
            out.push(candidate.clone());
        }
        if out.len() >= limit.max(1) {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        [
            "get_accounts",
            "get_account",
            "get_transactions",
            "create_payment_entry_template",
            "get_counterparties",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn close_typo_finds_the_tool() {
        let out = suggest("get_acounts", &names(), 3);
        assert_eq!(out.first().map(String::as_str), Some("get_accounts"));
    }

    #[test]
    fn unrelated_input_yields_nothing() {
        assert!(suggest("qqqqzzzz", &names(), 3).is_empty());
        assert!(suggest("   ", &names(), 3).is_empty());
    }
}
