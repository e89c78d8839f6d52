//! Entropy, information gain, and best-attribute selection.

use rand::Rng;

use crate::dataset::Dataset;

/// Shannon entropy (base 2) of the dataset's target-value distribution.
///
/// Exactly 0.0 when a single target value is present; `log2(0)` is never
/// evaluated because only observed values (count >= 1) contribute.
#[must_use]
pub fn entropy(dataset: &Dataset) -> f64 {
    let n = dataset.len() as f64;
    dataset
        .target_values()
        .into_iter()
        .map(|value| {
            let p = dataset.count_matching(Some(value), None) as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Reduction in entropy from partitioning the dataset on `attribute`: parent
/// entropy minus the size-weighted entropy of each value partition.
///
/// Non-negative for any attribute; exactly 0.0 for a constant attribute.
#[must_use]
pub fn information_gain(dataset: &Dataset, attribute: &str) -> f64 {
    let n = dataset.len() as f64;
    let weighted: f64 = dataset
        .attribute_values(attribute)
        .into_iter()
        .map(|value| {
            let part = dataset.partition(attribute, value);
            entropy(&part) * part.len() as f64 / n
        })
        .sum();
    entropy(dataset) - weighted
}

/// Pick the candidate attribute with the highest information gain.
///
/// Candidates are the dataset's attributes in declaration order. When
/// `max_features` caps them below the full count, a uniformly random subset
/// of that size is drawn without replacement (partial Fisher-Yates); a cap
/// covering every attribute leaves the order untouched. Gain ties keep the
/// earliest candidate.
///
/// Returns `None` when the dataset has no attributes.
pub(crate) fn best_attribute(
    dataset: &Dataset,
    max_features: Option<usize>,
    rng: &mut impl Rng,
) -> Option<String> {
    let names = dataset.attribute_names();
    if names.is_empty() {
        return None;
    }

    let take = max_features.unwrap_or(names.len()).min(names.len());
    let mut order: Vec<usize> = (0..names.len()).collect();
    if take < names.len() {
        // Partial Fisher-Yates: only the first `take` positions are drawn.
        for i in 0..take {
            let j = rng.gen_range(i..order.len());
            order.swap(i, j);
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for &index in &order[..take] {
        let name = names[index].as_str();
        let gain = information_gain(dataset, name);
        if best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((name, gain));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{best_attribute, entropy, information_gain};
    use crate::dataset::{Dataset, Example};

    fn make_dataset(attributes: &[&str], target: &str, rows: &[(&[&str], &str)]) -> Dataset {
        let examples = rows
            .iter()
            .map(|(values, target_value)| {
                let attrs = attributes
                    .iter()
                    .zip(values.iter())
                    .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                    .collect();
                Example::new(attrs, (*target_value).to_string())
            })
            .collect();
        Dataset::new(
            attributes.iter().map(|s| (*s).to_string()).collect(),
            target.to_string(),
            examples,
        )
        .unwrap()
    }

    fn weather_dataset() -> Dataset {
        make_dataset(
            &["weather", "temp"],
            "play",
            &[
                (&["sunny", "hot"], "yes"),
                (&["sunny", "hot"], "yes"),
                (&["rainy", "cool"], "no"),
                (&["rainy", "cool"], "no"),
            ],
        )
    }

    #[test]
    fn entropy_single_target_is_zero() {
        let ds = make_dataset(&["x"], "label", &[(&["1"], "a"), (&["2"], "a")]);
        assert!((entropy(&ds)).abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_uniform_two_class_is_one() {
        let ds = make_dataset(
            &["x"],
            "label",
            &[(&["1"], "a"), (&["2"], "a"), (&["3"], "b"), (&["4"], "b")],
        );
        assert!((entropy(&ds) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_uniform_three_class() {
        let ds = make_dataset(
            &["x"],
            "label",
            &[(&["1"], "a"), (&["2"], "b"), (&["3"], "c")],
        );
        assert!((entropy(&ds) - 3.0_f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn gain_is_one_for_perfect_separator() {
        let ds = weather_dataset();
        assert!((information_gain(&ds, "weather") - 1.0).abs() < 1e-12);
        // temp separates this table just as perfectly.
        assert!((information_gain(&ds, "temp") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gain_is_zero_for_constant_attribute() {
        let ds = make_dataset(
            &["weather", "temp"],
            "play",
            &[(&["sunny", "hot"], "yes"), (&["rainy", "hot"], "no")],
        );
        assert!(information_gain(&ds, "temp").abs() < 1e-12);
        assert!((information_gain(&ds, "weather") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gain_non_negative_for_multi_valued_attribute() {
        let ds = make_dataset(
            &["color"],
            "label",
            &[
                (&["red"], "a"),
                (&["red"], "b"),
                (&["blue"], "a"),
                (&["blue"], "b"),
                (&["green"], "b"),
            ],
        );
        assert!(information_gain(&ds, "color") >= 0.0);
    }

    #[test]
    fn best_attribute_tie_keeps_first_declared() {
        let ds = weather_dataset();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(
            best_attribute(&ds, None, &mut rng).as_deref(),
            Some("weather")
        );
    }

    #[test]
    fn best_attribute_prefers_higher_gain() {
        let ds = make_dataset(
            &["temp", "weather"],
            "play",
            &[(&["hot", "sunny"], "yes"), (&["hot", "rainy"], "no")],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(
            best_attribute(&ds, None, &mut rng).as_deref(),
            Some("weather")
        );
    }

    #[test]
    fn best_attribute_cap_above_count_uses_full_set() {
        let ds = weather_dataset();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(
            best_attribute(&ds, Some(10), &mut rng).as_deref(),
            Some("weather")
        );
    }

    #[test]
    fn best_attribute_none_without_attributes() {
        let ds = make_dataset(&[], "label", &[(&[], "a"), (&[], "b")]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(best_attribute(&ds, None, &mut rng), None);
    }

    #[test]
    fn best_attribute_subsample_picks_a_declared_attribute() {
        let ds = weather_dataset();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = best_attribute(&ds, Some(1), &mut rng).unwrap();
        assert!(picked == "weather" || picked == "temp");
    }
}
