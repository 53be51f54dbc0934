//! Template registry and best-match selection.
//!
//! # Responsibilities
//! - Hold many templates keyed by an associated value and pick the best one
//!   for a concrete input URL in one pass.
//! - Share structure: templates with a common prefix share tree nodes, so
//!   matching cost follows input length, not registry size.
//! - Extract parameter bindings from the winning match.
//!
//! # Design Decisions
//! - Glob nodes stay in the candidate set while input segments keep arriving,
//!   which is what lets `{p=**}` span several segments and lets a glob sit in
//!   the middle of a template.
//! - A wildcard port is optional once a host matched, because real URLs omit
//!   default ports. A static port stays mandatory.
//! - Best match = deepest node, then most specific segment kind, then first
//!   registered. All three rules are deterministic under concurrent reads
//!   because the tree is immutable after construction.
//! - Nodes live in an arena indexed by `usize` instead of holding parent
//!   pointers, which is the usual Rust shape for this kind of tree.

use super::params::BasicParams;
use super::segment::{Segment, SegmentKind, ValueKind};
use super::template::Template;

/// A registered template with its associated value.
struct Entry<V> {
    template: Template,
    value: V,
}

/// One node of the shared prefix tree.
struct PathNode {
    depth: usize,
    segment: Option<Segment>,
    children: Vec<usize>,
    /// Entries whose query constraints hang off this path position.
    queries: Vec<usize>,
    /// Entry that ends exactly here with no query constraints.
    leaf: Option<usize>,
}

impl PathNode {
    fn rank(&self) -> u8 {
        match &self.segment {
            None => 6,
            Some(segment) => match segment.min_kind() {
                ValueKind::Static => 1,
                ValueKind::Regex => 2,
                ValueKind::Star => 3,
                ValueKind::Glob => 5,
            },
        }
    }

    fn is_glob(&self) -> bool {
        self.segment.as_ref().is_some_and(Segment::is_glob)
    }
}

/// One consumed input segment during matching: which node accepted it and
/// which candidate it extends.
struct Step<'i> {
    parent: Option<usize>,
    node: usize,
    input: Option<&'i Segment>,
}

/// The result of a successful match.
pub struct Match<'a, V> {
    template: &'a Template,
    value: &'a V,
    params: BasicParams,
}

impl<'a, V> Match<'a, V> {
    pub fn template(&self) -> &'a Template {
        self.template
    }

    pub fn value(&self) -> &'a V {
        self.value
    }

    pub fn params(&self) -> &BasicParams {
        &self.params
    }

    pub fn into_params(self) -> BasicParams {
        self.params
    }
}

/// Matches input URLs against a set of registered templates.
pub struct Matcher<V> {
    entries: Vec<Entry<V>>,
    nodes: Vec<PathNode>,
}

impl<V> Default for Matcher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Matcher<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            nodes: vec![PathNode {
                depth: 0,
                segment: None,
                children: Vec::new(),
                queries: Vec::new(),
                leaf: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value registered for exactly this template, if any.
    pub fn get(&self, template: &Template) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.template == *template)
            .map(|e| &e.value)
    }

    /// Registers a template. On structurally identical templates the first
    /// registration wins.
    pub fn add(&mut self, template: Template, value: V) {
        let entry = self.entries.len();

        let mut segments: Vec<Segment> = Vec::new();
        for segment in [
            template.scheme(),
            template.username(),
            template.password(),
            template.host(),
            template.port(),
        ]
        .into_iter()
        .flatten()
        {
            segments.push(segment.clone());
        }
        segments.extend(template.path().iter().cloned());
        if let Some(fragment) = template.fragment() {
            segments.push(fragment.clone());
        }

        let mut node = 0;
        for segment in segments {
            node = self.descend(node, segment);
        }

        if template.query().is_empty() && template.extra_query().is_none() {
            if self.nodes[node].leaf.is_none() {
                self.nodes[node].leaf = Some(entry);
            }
        } else {
            self.nodes[node].queries.push(entry);
        }
        self.entries.push(Entry { template, value });
    }

    fn descend(&mut self, parent: usize, segment: Segment) -> usize {
        let existing = self.nodes[parent].children.iter().copied().find(|&c| {
            self.nodes[c]
                .segment
                .as_ref()
                .is_some_and(|s| s.same_shape(&segment))
        });
        if let Some(child) = existing {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(PathNode {
            depth: self.nodes[parent].depth + 1,
            segment: Some(segment),
            children: Vec::new(),
            queries: Vec::new(),
            leaf: None,
        });
        self.nodes[parent].children.push(child);
        child
    }

    /// Finds the best registered template for a parsed input URL.
    pub fn match_template<'s>(&'s self, input: &Template) -> Option<Match<'s, V>> {
        let mut steps: Vec<Step> = vec![Step {
            parent: None,
            node: 0,
            input: None,
        }];
        let mut candidates: Vec<usize> = vec![0];

        self.advance(input.scheme(), &mut steps, &mut candidates);
        if candidates.is_empty() {
            return None;
        }
        self.advance(input.username(), &mut steps, &mut candidates);
        self.advance(input.password(), &mut steps, &mut candidates);
        self.advance(input.host(), &mut steps, &mut candidates);
        if candidates.is_empty() {
            return None;
        }
        if input.host().is_some() {
            self.advance_optional(input.port(), &mut steps, &mut candidates);
            if candidates.is_empty() {
                return None;
            }
        }
        for segment in input.path() {
            self.advance(Some(segment), &mut steps, &mut candidates);
            if candidates.is_empty() {
                return None;
            }
        }
        self.advance(input.fragment(), &mut steps, &mut candidates);
        if candidates.is_empty() {
            return None;
        }

        self.pick_best(input, &steps, &candidates)
    }

    /// Moves every candidate across one input segment: into matching children
    /// and, for glob nodes, back into themselves.
    fn advance<'i>(
        &self,
        segment: Option<&'i Segment>,
        steps: &mut Vec<Step<'i>>,
        candidates: &mut Vec<usize>,
    ) {
        let Some(segment) = segment else { return };
        let mut next = Vec::new();
        for &candidate in candidates.iter() {
            let node_idx = steps[candidate].node;
            let node = &self.nodes[node_idx];
            // Children first: on a tie the chain that left a glob as early as
            // possible wins, so a glob consumes only what nothing after it
            // can.
            for &child in &node.children {
                let matches = self.nodes[child]
                    .segment
                    .as_ref()
                    .is_some_and(|s| s.matches(segment));
                if matches {
                    steps.push(Step {
                        parent: Some(candidate),
                        node: child,
                        input: Some(segment),
                    });
                    next.push(steps.len() - 1);
                }
            }
            if node.is_glob() {
                steps.push(Step {
                    parent: Some(candidate),
                    node: node_idx,
                    input: Some(segment),
                });
                next.push(steps.len() - 1);
            }
        }
        *candidates = next;
    }

    /// Port handling. Only port children participate at this level. When the
    /// input has no port the candidate itself stays live, so templates
    /// without a port segment keep matching, and a wildcard port node may be
    /// skipped without consuming anything. A static port is a hard
    /// requirement and is never skipped.
    fn advance_optional<'i>(
        &self,
        segment: Option<&'i Segment>,
        steps: &mut Vec<Step<'i>>,
        candidates: &mut Vec<usize>,
    ) {
        let mut next = Vec::new();
        for &candidate in candidates.iter() {
            let node_idx = steps[candidate].node;
            if segment.is_none() {
                next.push(candidate);
            }
            for &child in &self.nodes[node_idx].children {
                let Some(child_seg) = self.nodes[child].segment.as_ref() else {
                    continue;
                };
                if *child_seg.kind() != SegmentKind::Port {
                    continue;
                }
                let keep = match segment {
                    Some(segment) => child_seg.matches(segment),
                    None => child_seg.min_kind() != ValueKind::Static,
                };
                if keep {
                    steps.push(Step {
                        parent: Some(candidate),
                        node: child,
                        input: segment,
                    });
                    next.push(steps.len() - 1);
                }
            }
        }
        *candidates = next;
    }

    fn pick_best<'s>(
        &'s self,
        input: &Template,
        steps: &[Step<'_>],
        candidates: &[usize],
    ) -> Option<Match<'s, V>> {
        let mut best_entry: Option<usize> = None;
        let mut best_path: Option<usize> = None;
        let mut best_query: Option<usize> = None;
        let mut best_step: Option<usize> = None;

        for &candidate in candidates {
            let node_idx = steps[candidate].node;
            let node = &self.nodes[node_idx];
            let better = match best_path {
                None => true,
                Some(best) => {
                    let best = &self.nodes[best];
                    node.depth > best.depth
                        || (node.depth == best.depth && node.rank() < best.rank())
                }
            };
            if !better {
                continue;
            }
            if let Some(leaf) = node.leaf {
                best_path = Some(node_idx);
                best_query = None;
                best_entry = Some(leaf);
                best_step = Some(candidate);
            }
            if !node.queries.is_empty() {
                if let Some(query_entry) = self.pick_best_query(input, node) {
                    best_path = Some(node_idx);
                    best_query = Some(query_entry);
                    best_entry = Some(query_entry);
                    best_step = Some(candidate);
                }
            }
        }

        let entry_idx = best_entry?;
        let entry = &self.entries[entry_idx];
        let params = self.extract_params(
            input,
            entry,
            best_query.is_some(),
            best_step,
            steps,
        );
        Some(Match {
            template: &entry.template,
            value: &entry.value,
            params,
        })
    }

    /// Among the query-constrained entries at one node, picks the one whose
    /// named queries all match with the highest match count.
    fn pick_best_query(&self, input: &Template, node: &PathNode) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_count = 0;
        for &query_entry in &node.queries {
            let template = &self.entries[query_entry].template;
            let named = template.query().len();
            let count = calc_query_match_count(template, input);
            let matches_named = count >= named;
            let matches_extra = match template.extra_query() {
                None => true,
                // Binding catch-alls accept an empty remainder; the unbound
                // forms ?* and ?** require something left over to consume.
                Some(extra) if !extra.param_name().is_empty() => true,
                Some(_) => input.query().len() > named,
            };
            if (best.is_none() || count > best_count) && matches_named && matches_extra {
                best_count = count;
                best = Some(query_entry);
            }
        }
        best
    }

    fn extract_params(
        &self,
        input: &Template,
        entry: &Entry<V>,
        via_query: bool,
        best_step: Option<usize>,
        steps: &[Step<'_>],
    ) -> BasicParams {
        let mut params = BasicParams::new();

        // Path and authority bindings, in URL order.
        let mut chain = Vec::new();
        let mut cursor = best_step;
        while let Some(idx) = cursor {
            let step = &steps[idx];
            if self.nodes[step.node].depth == 0 {
                break;
            }
            chain.push(idx);
            cursor = step.parent;
        }
        for &idx in chain.iter().rev() {
            let step = &steps[idx];
            if let (Some(template_seg), Some(input_seg)) =
                (self.nodes[step.node].segment.as_ref(), step.input)
            {
                extract_segment(template_seg, input_seg, &mut params);
            }
        }

        if via_query {
            let mut consumed: Vec<&str> = Vec::new();
            for template_seg in entry.template.query() {
                let name = template_seg.query_name().unwrap_or_default();
                if let Some(input_seg) = input.query_segment(name) {
                    if template_seg.matches(input_seg) {
                        consumed.push(name);
                        extract_segment(template_seg, input_seg, &mut params);
                    }
                }
            }
            // A binding catch-all sweeps up whatever the named queries did
            // not consume, keyed by the input query names.
            if let Some(extra) = entry.template.extra_query() {
                if !extra.param_name().is_empty() {
                    for input_seg in input.query() {
                        let name = input_seg.query_name().unwrap_or_default();
                        if consumed.contains(&name) || params.contains(name) {
                            continue;
                        }
                        for value in input_seg.values() {
                            params.add(name, value.effective_pattern().map(str::to_string));
                        }
                    }
                }
            }
        }

        params
    }
}

fn extract_segment(template_seg: &Segment, input_seg: &Segment, params: &mut BasicParams) {
    let name = template_seg.param_name();
    if name.is_empty() {
        return;
    }
    for value in input_seg.values() {
        params.add(name, value.effective_pattern().map(str::to_string));
    }
}

/// Number of named template queries satisfied by the input, or zero as soon
/// as any of them is not.
fn calc_query_match_count(template: &Template, input: &Template) -> usize {
    let mut count = 0;
    for template_seg in template.query() {
        let name = template_seg.query_name().unwrap_or_default();
        match input.query_segment(name) {
            Some(input_seg) if template_seg.matches(input_seg) => count += 1,
            _ => return 0,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urltemplate::params::Resolver;
    use crate::urltemplate::parser::{parse_literal, parse_template};

    fn matcher(templates: &[&str]) -> Matcher<usize> {
        let mut m = Matcher::new();
        for (i, t) in templates.iter().enumerate() {
            m.add(parse_template(t), i);
        }
        m
    }

    fn resolve(params: &BasicParams, name: &str) -> Vec<Option<String>> {
        params.resolve(name).unwrap_or_default()
    }

    #[test]
    fn exact_path_match_binds_params() {
        let m = matcher(&["/webhdfs/{version}/{path=**}"]);
        let r = m.match_template(&parse_literal("/webhdfs/v1/tmp/file")).unwrap();
        assert_eq!(*r.value(), 0);
        assert_eq!(resolve(r.params(), "version"), vec![Some("v1".to_string())]);
        assert_eq!(
            resolve(r.params(), "path"),
            vec![Some("tmp".to_string()), Some("file".to_string())]
        );
    }

    #[test]
    fn deeper_template_wins() {
        let m = matcher(&["/a/{rest=**}", "/a/b/{rest=**}"]);
        let r = m.match_template(&parse_literal("/a/b/c")).unwrap();
        assert_eq!(*r.value(), 1);
    }

    #[test]
    fn static_beats_wildcard_at_same_depth() {
        let m = matcher(&["/a/{x=*}", "/a/b"]);
        let r = m.match_template(&parse_literal("/a/b")).unwrap();
        assert_eq!(*r.value(), 1);

        // Registration order does not change the outcome.
        let m = matcher(&["/a/b", "/a/{x=*}"]);
        let r = m.match_template(&parse_literal("/a/b")).unwrap();
        assert_eq!(*r.value(), 0);
    }

    #[test]
    fn star_beats_glob_at_same_depth() {
        let m = matcher(&["/a/{x=**}", "/a/{y=*}"]);
        let r = m.match_template(&parse_literal("/a/b")).unwrap();
        assert_eq!(*r.value(), 1);
    }

    #[test]
    fn first_registered_wins_on_tie() {
        let m = matcher(&["/a/{x=*}", "/a/{y=*}"]);
        let r = m.match_template(&parse_literal("/a/b")).unwrap();
        assert_eq!(*r.value(), 0);

        let m = matcher(&["/a/{y=*}", "/a/{x=*}"]);
        let r = m.match_template(&parse_literal("/a/b")).unwrap();
        assert_eq!(*r.value(), 0);
    }

    #[test]
    fn glob_spans_multiple_segments_in_the_middle() {
        let m = matcher(&["/a/{g=**}/z"]);
        let r = m.match_template(&parse_literal("/a/b1/b2/z")).unwrap();
        assert_eq!(
            resolve(r.params(), "g"),
            vec![Some("b1".to_string()), Some("b2".to_string())]
        );
        assert!(m.match_template(&parse_literal("/a/z/oops")).is_none());
    }

    #[test]
    fn glob_consumes_at_least_one_segment() {
        let m = matcher(&["/a/{g=**}"]);
        assert!(m.match_template(&parse_literal("/a")).is_none());
        assert!(m.match_template(&parse_literal("/a/b")).is_some());
    }

    #[test]
    fn naked_authority_input_matches_host_port_template() {
        let m = matcher(&["{host}:{port}"]);
        let r = m.match_template(&parse_literal("test-host:777")).unwrap();
        assert_eq!(resolve(r.params(), "host"), vec![Some("test-host".to_string())]);
        assert_eq!(resolve(r.params(), "port"), vec![Some("777".to_string())]);
    }

    #[test]
    fn port_is_optional_when_host_is_present() {
        let m = matcher(&["*://{host}:{port}/{path=**}"]);
        let r = m.match_template(&parse_literal("http://example.com/a/b")).unwrap();
        assert_eq!(
            resolve(r.params(), "host"),
            vec![Some("example.com".to_string())]
        );
        assert_eq!(resolve(r.params(), "port"), Vec::<Option<String>>::new());

        let r = m.match_template(&parse_literal("http://example.com:8443/a/b")).unwrap();
        assert_eq!(resolve(r.params(), "port"), vec![Some("8443".to_string())]);
    }

    #[test]
    fn portless_template_matches_portless_host_input() {
        let m = matcher(&["http://h/{p=*}"]);
        let r = m.match_template(&parse_literal("http://h/x")).unwrap();
        assert_eq!(resolve(r.params(), "p"), vec![Some("x".to_string())]);
        // An explicit input port has no template position to land in.
        assert!(m.match_template(&parse_literal("http://h:8080/x")).is_none());
    }

    #[test]
    fn static_port_is_never_skipped() {
        let m = matcher(&["http://{host=*}:50070/{p=**}"]);
        assert!(m
            .match_template(&parse_literal("http://nn:50070/webhdfs/v1"))
            .is_some());
        assert!(m
            .match_template(&parse_literal("http://nn:9000/webhdfs/v1"))
            .is_none());
        assert!(m
            .match_template(&parse_literal("http://elsewhere/none"))
            .is_none());
    }

    #[test]
    fn query_constrained_template_needs_all_named_queries() {
        let m = matcher(&["/svc?op={op}", "/svc?op={op}&user={user}"]);

        let r = m.match_template(&parse_literal("/svc?op=ls&user=alice")).unwrap();
        assert_eq!(*r.value(), 1);
        assert_eq!(resolve(r.params(), "op"), vec![Some("ls".to_string())]);
        assert_eq!(resolve(r.params(), "user"), vec![Some("alice".to_string())]);

        let r = m.match_template(&parse_literal("/svc?op=ls")).unwrap();
        assert_eq!(*r.value(), 0);
    }

    #[test]
    fn binding_catch_all_collects_unconsumed_queries() {
        let m = matcher(&["/svc?op={op}&{**}"]);
        let r = m
            .match_template(&parse_literal("/svc?op=ls&a=1&flag&a=2"))
            .unwrap();
        assert_eq!(resolve(r.params(), "op"), vec![Some("ls".to_string())]);
        assert_eq!(
            resolve(r.params(), "a"),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
        // Valueless parameters bind as present-without-value.
        assert_eq!(resolve(r.params(), "flag"), vec![None]);
    }

    #[test]
    fn unbound_catch_all_requires_leftover_input() {
        let m = matcher(&["/svc?op={op}&**"]);
        assert!(m.match_template(&parse_literal("/svc?op=ls")).is_none());
        assert!(m.match_template(&parse_literal("/svc?op=ls&extra=1")).is_some());

        // The braced form accepts an empty remainder.
        let m = matcher(&["/svc?op={op}&{**}"]);
        assert!(m.match_template(&parse_literal("/svc?op=ls")).is_some());
    }

    #[test]
    fn regex_segment_matches_within_one_segment() {
        let m = matcher(&["/files/{name=*.ext}"]);
        assert!(m.match_template(&parse_literal("/files/a.ext")).is_some());
        assert!(m.match_template(&parse_literal("/files/a.tar")).is_none());
    }

    #[test]
    fn scheme_and_fragment_participate() {
        let m = matcher(&["{scheme}://h/p#{frag}"]);
        let r = m.match_template(&parse_literal("https://h/p#sec")).unwrap();
        assert_eq!(resolve(r.params(), "scheme"), vec![Some("https".to_string())]);
        assert_eq!(resolve(r.params(), "frag"), vec![Some("sec".to_string())]);
        assert!(m.match_template(&parse_literal("https://h/p")).is_none());
    }

    #[test]
    fn get_returns_registered_value() {
        let mut m = Matcher::new();
        let t = parse_template("/a/{b=*}");
        m.add(t.clone(), "v");
        assert_eq!(m.get(&t), Some(&"v"));
        assert_eq!(m.get(&parse_template("/other")), None);
    }

    #[test]
    fn no_match_returns_none() {
        let m = matcher(&["/only/this"]);
        assert!(m.match_template(&parse_literal("/something/else")).is_none());
    }
}
