//! # Filter Interoperability
//!
//! A filter serialized by one process must answer identically after being
//! rebuilt by another, since requesters and the server never share memory.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{distributions::Alphanumeric, Rng};

    use mr_01_bloom_filter::{theoretical_fpr, BloomFilter};
    use mr_02_message_store::InMemoryMessageStore;
    use mr_03_reconciliation::{ReconciliationApi, ReconciliationService};
    use mr_04_api_gateway::{BloomEncoding, LimitsConfig};

    fn random_ids(count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                (0..24)
                    .map(|_| rng.sample(Alphanumeric) as char)
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_independent_builders_produce_identical_bytes() {
        let ids = random_ids(500);

        let mut first = BloomFilter::new(8_192, 5).unwrap();
        let mut second = BloomFilter::new(8_192, 5).unwrap();
        for id in &ids {
            first.insert(id);
        }
        for id in ids.iter().rev() {
            second.insert(id);
        }

        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn test_wire_roundtrip_preserves_membership() {
        let inserted = random_ids(1_000);
        let probes = random_ids(1_000);

        let mut filter = BloomFilter::with_capacity(1_000, 0.01).unwrap();
        for id in &inserted {
            filter.insert(id);
        }

        let encoded = serde_json::to_string(&BloomEncoding::from_filter(&filter)).unwrap();
        let decoded: BloomEncoding = serde_json::from_str(&encoded).unwrap();
        let rebuilt = decoded.decode(&LimitsConfig::default()).unwrap();

        for id in inserted.iter().chain(&probes) {
            assert_eq!(filter.may_contain(id), rebuilt.may_contain(id));
        }
    }

    #[test]
    fn test_reconciliation_false_positive_rate_is_bounded() {
        let store = Arc::new(InMemoryMessageStore::new());
        let service = ReconciliationService::with_defaults(store).unwrap();

        let held = random_ids(500);
        let unknown = random_ids(5_000);
        service.publish(&held).unwrap();
        service.publish(&unknown).unwrap();

        let (m, k) = (4_800, 7);
        let mut filter = BloomFilter::new(m, k).unwrap();
        for id in &held {
            filter.insert(id);
        }

        let matched = service.filter_out(&filter).unwrap();
        assert!(held.iter().all(|id| matched.contains(id)));

        let false_positives = matched.len() - held.len();
        let observed = false_positives as f64 / unknown.len() as f64;
        let expected = theoretical_fpr(m, held.len(), k);
        assert!(
            observed < expected * 3.0 + 0.005,
            "observed {} vs theoretical {}",
            observed,
            expected
        );
    }

    #[test]
    fn test_merged_requester_filters() {
        let store = Arc::new(InMemoryMessageStore::new());
        let service = ReconciliationService::with_defaults(store).unwrap();
        let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        service.publish(&ids).unwrap();

        let mut left = BloomFilter::with_capacity(100, 0.0001).unwrap();
        let mut right = BloomFilter::with_capacity(100, 0.0001).unwrap();
        left.insert("a");
        right.insert("c");
        left.merge(&right).unwrap();

        let matched = service.filter_out(&left).unwrap();
        assert_eq!(matched, vec!["a".to_string(), "c".to_string()]);
    }
}
