use common::{IndicatorCalculationDetail, VariableValue, Variables};

/// Incrementally assembles an [`IndicatorCalculationDetail`]
pub(crate) struct DetailBuilder {
    formula: String,
    variables: Variables,
    steps: Vec<String>,
}

impl DetailBuilder {
    pub(crate) fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            variables: Variables::new(),
            steps: Vec::new(),
        }
    }

    pub(crate) fn var(&mut self, name: &str, value: impl Into<VariableValue>) -> &mut Self {
        self.variables.insert(name, value);
        self
    }

    pub(crate) fn step(&mut self, step: impl Into<String>) -> &mut Self {
        self.steps.push(step.into());
        self
    }

    pub(crate) fn finish(
        self,
        result: f64,
        interpretation: impl Into<String>,
    ) -> IndicatorCalculationDetail {
        IndicatorCalculationDetail {
            formula: self.formula,
            variables: self.variables,
            steps: self.steps,
            result,
            interpretation: interpretation.into(),
        }
    }
}

/// Comma-separated prices with two decimals
pub(crate) fn format_prices(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{:.2}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trailing `period` elements, or the whole slice when shorter
pub(crate) fn trailing(values: &[f64], period: usize) -> &[f64] {
    &values[values.len().saturating_sub(period)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_in_order() {
        let mut builder = DetailBuilder::new("X = a + b");
        builder.var("a", 1.0).var("b", 2.0);
        builder.step("a + b = 3");
        let detail = builder.finish(3.0, "fine");

        assert_eq!(detail.formula, "X = a + b");
        assert_eq!(detail.variables.len(), 2);
        assert_eq!(detail.steps, vec!["a + b = 3".to_string()]);
        assert_eq!(detail.result, 3.0);
    }

    #[test]
    fn test_trailing() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing(&values, 2), &[3.0, 4.0]);
        assert_eq!(trailing(&values, 10), &values);
        assert!(trailing(&[], 3).is_empty());
    }

    #[test]
    fn test_format_prices() {
        assert_eq!(format_prices(&[1.0, 2.5]), "1.00, 2.50");
    }
}
