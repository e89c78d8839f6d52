//! Categorical datasets: named attributes, verbatim string values, one target
//! value per example.

use std::collections::HashMap;

use crate::ForestError;

/// A single labeled example: categorical attribute values plus one target
/// value.
///
/// Immutable after creation. Values are matched by exact string equality
/// everywhere; there is no numeric coercion.
#[derive(Debug, Clone)]
pub struct Example {
    attributes: HashMap<String, String>,
    target: String,
}

impl Example {
    /// Create a new example from attribute values and a target value.
    #[must_use]
    pub fn new(attributes: HashMap<String, String>, target: String) -> Self {
        Self { attributes, target }
    }

    /// Return the value of the named attribute, if the example carries one.
    #[must_use]
    pub fn attribute_value(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }

    /// Return the target value.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// An ordered collection of examples over a fixed set of named categorical
/// attributes and one target.
///
/// Immutable once built: [`partition`](Dataset::partition) and
/// [`subset`](Dataset::subset) always produce a new dataset, never mutate the
/// parent.
#[derive(Debug, Clone)]
pub struct Dataset {
    attribute_names: Vec<String>,
    target_name: String,
    examples: Vec<Example>,
}

impl Dataset {
    /// Build a validated dataset.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ForestError::DuplicateAttribute`] | An attribute name is declared twice |
    /// | [`ForestError::TargetIsAttribute`] | The target name is also an attribute name |
    /// | [`ForestError::MissingAttributeValue`] | An example has no value for a declared attribute |
    pub fn new(
        attribute_names: Vec<String>,
        target_name: String,
        examples: Vec<Example>,
    ) -> Result<Self, ForestError> {
        for (i, name) in attribute_names.iter().enumerate() {
            if attribute_names[..i].contains(name) {
                return Err(ForestError::DuplicateAttribute { name: name.clone() });
            }
        }
        if attribute_names.contains(&target_name) {
            return Err(ForestError::TargetIsAttribute { name: target_name });
        }
        for (example_index, example) in examples.iter().enumerate() {
            for name in &attribute_names {
                if example.attribute_value(name).is_none() {
                    return Err(ForestError::MissingAttributeValue {
                        attribute: name.clone(),
                        example_index,
                    });
                }
            }
        }
        Ok(Self {
            attribute_names,
            target_name,
            examples,
        })
    }

    /// Return the declared attribute names, in declaration order.
    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Return the name of the target column.
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Return the examples in dataset order.
    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Return the number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Return `true` if the dataset has no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Distinct values of the named attribute, in first-encountered order.
    ///
    /// Empty for an attribute the dataset does not declare.
    #[must_use]
    pub fn attribute_values(&self, attribute: &str) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for example in &self.examples {
            if let Some(value) = example.attribute_value(attribute)
                && !values.contains(&value)
            {
                values.push(value);
            }
        }
        values
    }

    /// Distinct target values, in first-encountered order.
    #[must_use]
    pub fn target_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for example in &self.examples {
            if !values.contains(&example.target()) {
                values.push(example.target());
            }
        }
        values
    }

    /// Count the examples matching an optional target filter and/or an
    /// optional `(attribute, value)` filter.
    #[must_use]
    pub fn count_matching(&self, target: Option<&str>, attribute: Option<(&str, &str)>) -> usize {
        self.examples
            .iter()
            .filter(|example| {
                target.map_or(true, |t| example.target() == t)
                    && attribute.map_or(true, |(name, value)| {
                        example.attribute_value(name) == Some(value)
                    })
            })
            .count()
    }

    /// The most frequent target value; ties keep the value encountered first
    /// in dataset order. `None` when the dataset is empty.
    #[must_use]
    pub fn majority_target(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for example in &self.examples {
            match counts.iter_mut().find(|(value, _)| *value == example.target()) {
                Some((_, count)) => *count += 1,
                None => counts.push((example.target(), 1)),
            }
        }
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }

    /// A filtered copy containing only the examples where
    /// `attribute == value`, with that attribute dropped from the copy's
    /// attribute set (it is constant within the partition).
    #[must_use]
    pub fn partition(&self, attribute: &str, value: &str) -> Dataset {
        let attribute_names: Vec<String> = self
            .attribute_names
            .iter()
            .filter(|name| name.as_str() != attribute)
            .cloned()
            .collect();
        let examples: Vec<Example> = self
            .examples
            .iter()
            .filter(|example| example.attribute_value(attribute) == Some(value))
            .map(|example| {
                let attributes = attribute_names
                    .iter()
                    .map(|name| {
                        let kept = example
                            .attribute_value(name)
                            .expect("every example carries every declared attribute");
                        (name.clone(), kept.to_string())
                    })
                    .collect();
                Example::new(attributes, example.target().to_string())
            })
            .collect();
        Dataset {
            attribute_names,
            target_name: self.target_name.clone(),
            examples,
        }
    }

    /// A copy containing the examples at `indices`, in the given order.
    ///
    /// Indices may repeat; bootstrap resamples are built this way.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            attribute_names: self.attribute_names.clone(),
            target_name: self.target_name.clone(),
            examples: indices.iter().map(|&i| self.examples[i].clone()).collect(),
        }
    }
}
