use std::collections::HashMap;

/// A path parameter as extracted from one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParam {
    pub name: String,
    pub value: String,
    /// Zero-based index of the segment in the slash-split path.
    pub position: usize,
}

/// Per-request snapshot of the parameters of the matched route.
///
/// Built fresh by every match and owned by the request it was attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, UrlParam>);

impl Params {
    pub(crate) fn insert(&mut self, param: UrlParam) {
        self.0.insert(param.name.clone(), param);
    }

    /// The matched value of the parameter `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|param| param.value.as_str())
    }

    pub fn get_param(&self, name: &str) -> Option<&UrlParam> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UrlParam> {
        self.0.values()
    }
}

impl FromIterator<UrlParam> for Params {
    fn from_iter<T: IntoIterator<Item = UrlParam>>(iter: T) -> Self {
        let mut params = Self::default();
        for param in iter {
            params.insert(param);
        }
        params
    }
}
