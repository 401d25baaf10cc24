use crate::TreeError;
use graphql_ld_model::{
    QuerySolution, QuerySolutions, ResultTree, SingularizeVariables, Term, Variable,
};
use indexmap::{IndexMap, IndexSet};

/// Settings of a [`Converter`].
#[derive(Clone, Debug)]
pub struct TreeConverterSettings {
    /// Separates the path segments in variable names.
    pub delimiter: String,
    /// Whether leaves hold the RDF terms or only their lexical values.
    pub materialize_terms: bool,
    /// Whether a singular path with more than one distinct value is an error. Otherwise, the
    /// first value is used.
    pub strict_singularization: bool,
}

impl Default for TreeConverterSettings {
    fn default() -> Self {
        Self {
            delimiter: "_".to_owned(),
            materialize_terms: true,
            strict_singularization: false,
        }
    }
}

/// Reshapes flat solutions into a [`ResultTree`].
///
/// The root of the tree is always an object. Leaves collect the distinct values bound to their
/// variable, in order of appearance. Nested objects are created by grouping the solutions by the
/// values of the object's direct leaves. If some of these leaves are singular, only the singular
/// leaves identify an object.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    settings: TreeConverterSettings,
}

impl Converter {
    pub fn new(settings: TreeConverterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TreeConverterSettings {
        &self.settings
    }

    /// Reshapes `solutions`. Paths marked in `singularize` yield a single value (or
    /// [`ResultTree::Null`]) instead of a list.
    pub fn sparql_results_to_tree(
        &self,
        solutions: &QuerySolutions,
        singularize: &SingularizeVariables,
    ) -> Result<ResultTree, TreeError> {
        let mut root = PathNode::default();
        for variable in solutions.variables() {
            root.insert(variable, &self.settings.delimiter)?;
        }

        let rows = solutions.iter().collect::<Vec<_>>();
        self.object(&root, &mut Vec::new(), &rows, singularize)
            .map(ResultTree::Object)
    }

    fn object<'n>(
        &self,
        node: &'n PathNode<'_>,
        path: &mut Vec<&'n str>,
        rows: &[&QuerySolution],
        singularize: &SingularizeVariables,
    ) -> Result<IndexMap<String, ResultTree>, TreeError> {
        let mut object = IndexMap::with_capacity(node.children.len());
        for (key, child) in &node.children {
            path.push(key);
            let value = self.value(child, path, rows, singularize)?;
            path.pop();
            object.insert(key.clone(), value);
        }
        Ok(object)
    }

    fn value<'n>(
        &self,
        node: &'n PathNode<'_>,
        path: &mut Vec<&'n str>,
        rows: &[&QuerySolution],
        singularize: &SingularizeVariables,
    ) -> Result<ResultTree, TreeError> {
        let name = path.join(self.settings.delimiter.as_str());

        let mut values = if node.is_leaf() {
            rows.iter()
                .filter_map(|row| node.variable.and_then(|variable| row.get(variable)))
                .collect::<IndexSet<&Term>>()
                .into_iter()
                .map(|term| self.leaf(term))
                .collect::<Vec<_>>()
        } else {
            let identity = self.identity(node, &name, singularize);
            let mut groups = IndexMap::<Vec<Option<&Term>>, Vec<&QuerySolution>>::new();
            for row in rows.iter().filter(|row| node.is_bound(row)) {
                let key = identity
                    .iter()
                    .map(|variable| row.get(*variable))
                    .collect();
                groups.entry(key).or_default().push(*row);
            }
            groups
                .values()
                .map(|group| {
                    self.object(node, path, group, singularize)
                        .map(ResultTree::Object)
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if !singularize.is_singular(&name) {
            return Ok(ResultTree::List(values));
        }
        if self.settings.strict_singularization && values.len() > 1 {
            return Err(TreeError::MultipleSingularValues {
                path: name,
                count: values.len(),
            });
        }
        Ok(if values.is_empty() {
            ResultTree::Null
        } else {
            values.swap_remove(0)
        })
    }

    /// Returns the variables whose values identify an object at `node`.
    fn identity<'a>(
        &self,
        node: &PathNode<'a>,
        name: &str,
        singularize: &SingularizeVariables,
    ) -> Vec<&'a Variable> {
        let leaves = node
            .children
            .iter()
            .filter(|(_, child)| child.is_leaf())
            .filter_map(|(key, child)| child.variable.map(|variable| (key, variable)))
            .collect::<Vec<_>>();
        let singular = leaves
            .iter()
            .filter(|(key, _)| {
                singularize.is_singular(&format!("{name}{}{key}", self.settings.delimiter))
            })
            .map(|(_, variable)| *variable)
            .collect::<Vec<_>>();

        let mut identity = node.variable.into_iter().collect::<Vec<_>>();
        if singular.is_empty() {
            identity.extend(leaves.into_iter().map(|(_, variable)| variable));
        } else {
            identity.extend(singular);
        }
        identity
    }

    fn leaf(&self, term: &Term) -> ResultTree {
        if self.settings.materialize_terms {
            return ResultTree::Term(term.clone());
        }
        ResultTree::Plain(match term {
            Term::NamedNode(node) => node.as_str().to_owned(),
            Term::Literal(literal) => literal.value().to_owned(),
            _ => term.to_string(),
        })
    }
}

/// A node in the trie of variable paths.
#[derive(Debug, Default)]
struct PathNode<'a> {
    variable: Option<&'a Variable>,
    children: IndexMap<String, PathNode<'a>>,
}

impl<'a> PathNode<'a> {
    fn insert(&mut self, variable: &'a Variable, delimiter: &str) -> Result<(), TreeError> {
        let mut node = self;
        for segment in path_segments(variable.as_str(), delimiter)? {
            node = node.children.entry(segment).or_default();
        }
        node.variable = Some(variable);
        Ok(())
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `row` binds any variable at or below this node.
    fn is_bound(&self, row: &QuerySolution) -> bool {
        self.variable
            .is_some_and(|variable| row.get(variable).is_some())
            || self.children.values().any(|child| child.is_bound(row))
    }
}

/// Splits a variable name into path segments.
///
/// GraphQL names may start with underscores, e.g. `__typename`. Hence, consecutive delimiters
/// belong to the segment that follows them.
fn path_segments(name: &str, delimiter: &str) -> Result<Vec<String>, TreeError> {
    if delimiter.is_empty() {
        return Ok(vec![name.to_owned()]);
    }
    let mut segments = Vec::new();
    let mut prefix = String::new();
    for part in name.split(delimiter) {
        if part.is_empty() {
            prefix.push_str(delimiter);
        } else {
            segments.push(format!("{prefix}{part}"));
            prefix.clear();
        }
    }
    if !prefix.is_empty() {
        return Err(TreeError::InvalidVariableName(name.to_owned()));
    }
    Ok(segments)
}
