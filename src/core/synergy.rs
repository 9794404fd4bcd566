use crate::domain::model::Service;

/// 兩兩配對中互相標記為綜效的比例，範圍 [0, 1]
///
/// 任一方的 `synergies` 列出另一方即算一組；
/// 分母是服務數而不是配對數，因此三項以上服務很容易達到上限。
pub fn synergy_score(services: &[&Service]) -> f64 {
    if services.is_empty() {
        return 0.0;
    }

    let mut matches = 0usize;
    for (i, a) in services.iter().enumerate() {
        for b in &services[i + 1..] {
            if a.synergies.contains(&b.id) || b.synergies.contains(&a.id) {
                matches += 1;
            }
        }
    }

    (matches as f64 / services.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, synergies: &[&str]) -> Service {
        Service {
            id: id.to_string(),
            name: id.to_string(),
            base_price: 1000,
            setup_fee: None,
            duration_days: 5,
            dependencies: Vec::new(),
            synergies: synergies.iter().map(|s| s.to_string()).collect(),
            margin: 0.5,
            features: Vec::new(),
        }
    }

    #[test]
    fn test_no_synergy() {
        let a = service("a", &[]);
        let b = service("b", &[]);
        assert_eq!(synergy_score(&[&a, &b]), 0.0);
    }

    #[test]
    fn test_one_sided_declaration_counts() {
        let a = service("a", &["b"]);
        let b = service("b", &[]);
        // 1 組 / 2 項服務
        assert_eq!(synergy_score(&[&a, &b]), 0.5);
    }

    #[test]
    fn test_mutual_declaration_counts_once() {
        let a = service("a", &["b"]);
        let b = service("b", &["a"]);
        assert_eq!(synergy_score(&[&a, &b]), 0.5);
    }

    #[test]
    fn test_score_is_capped() {
        let a = service("a", &["b", "c"]);
        let b = service("b", &["c"]);
        let c = service("c", &[]);
        // 3 組 / 3 項服務
        assert_eq!(synergy_score(&[&a, &b, &c]), 1.0);

        let d = service("a", &["b", "c", "d"]);
        let e = service("b", &["c", "d"]);
        let f = service("c", &["d"]);
        let g = service("d", &[]);
        // 6 組 / 4 項服務，截到 1
        assert_eq!(synergy_score(&[&d, &e, &f, &g]), 1.0);
    }

    #[test]
    fn test_single_and_empty() {
        let a = service("a", &["a"]);
        assert_eq!(synergy_score(&[&a]), 0.0);
        assert_eq!(synergy_score(&[]), 0.0);
    }
}
