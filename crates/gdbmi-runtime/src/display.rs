use crate::ui::{DisplayContext, DisplayValue};
use gdbmi_types::Frame;
use std::collections::BTreeMap;

/// Watch expressions and the values they took at each stop address.
#[derive(Debug, Default)]
pub struct DisplayRegistry {
    exprs: Vec<String>,
    values: BTreeMap<String, Vec<DisplayValue>>,
}

impl DisplayRegistry {
    /// Register `expr`; returns `false` if it was already watched.
    pub fn add(&mut self, expr: &str) -> bool {
        if self.exprs.iter().any(|e| e == expr) {
            return false;
        }
        self.exprs.push(expr.to_string());
        true
    }

    pub fn exprs(&self) -> &[String] {
        &self.exprs
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Record the latest value of `expr` at `addr`.
    pub fn record(&mut self, addr: &str, expr: &str, value: String) {
        let values = self.values.entry(addr.to_string()).or_default();
        match values.iter_mut().find(|v| v.expr == expr) {
            Some(existing) => existing.value = value,
            None => values.push(DisplayValue {
                expr: expr.to_string(),
                value,
            }),
        }
    }

    pub fn values_at(&self, addr: &str) -> &[DisplayValue] {
        self.values.get(addr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn context(&self, session: &str, frame: &Frame) -> DisplayContext {
        let addr = stop_address(frame);
        DisplayContext {
            session: session.to_string(),
            values: self.values_at(&addr).to_vec(),
            addr,
            frame: frame.clone(),
        }
    }
}

pub(crate) fn stop_address(frame: &Frame) -> String {
    frame.addr.clone().unwrap_or_default()
}
