//! Model-document boundary
//!
//! SPM's TRANSLATE output arrives as permissively-typed XML: any
//! repeatable element may appear once or many times depending on
//! cardinality. Everything behind this boundary reads repeatable
//! elements through [`elements`], which yields an ordered sequence
//! either way, so cardinality never shapes downstream code.
//!
//! A decoder-level fault never crosses this boundary raw; it surfaces as
//! [`DocError::Malformed`], which callers treat as "no structured data
//! available" and fall back to the raw text.

use std::fmt;

use roxmltree::{Document, Node};

/// Errors at the model-document boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    /// The text was not well-formed XML.
    Malformed(String),
    /// The document parsed but its root is not the expected dialect.
    UnexpectedRoot(String),
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocError::Malformed(msg) => write!(f, "malformed model document: {}", msg),
            DocError::UnexpectedRoot(root) => {
                write!(f, "unexpected model document root element '{}'", root)
            }
        }
    }
}

impl std::error::Error for DocError {}

/// A parsed model/plot document. Borrows the XML text it was parsed
/// from; the caller owns the text for the document's lifetime.
#[derive(Debug)]
pub struct ModelDoc<'input> {
    doc: Document<'input>,
}

impl<'input> ModelDoc<'input> {
    /// Parse `text` as a model document.
    pub fn parse(text: &'input str) -> Result<ModelDoc<'input>, DocError> {
        let doc = Document::parse(text).map_err(|e| DocError::Malformed(e.to_string()))?;
        Ok(ModelDoc { doc })
    }

    /// The document's root element.
    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// The root element, checked against the expected dialect name.
    pub fn root_named(&self, name: &str) -> Result<Node<'_, 'input>, DocError> {
        let root = self.root();
        if root.has_tag_name(name) {
            Ok(root)
        } else {
            Err(DocError::UnexpectedRoot(root.tag_name().name().to_string()))
        }
    }
}

/// Child elements of `node` named `name`, in document order.
///
/// This is the single-vs-list normalization point: one matching child and
/// many matching children both come back as an iterator.
pub fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(name))
}
