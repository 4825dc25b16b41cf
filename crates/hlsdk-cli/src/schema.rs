//! # Schema Subcommand
//!
//! Prints the JSON Schema generated for a response model, or with `--paths`
//! the schema paths coverage is tracked under.

use anyhow::Result;
use clap::{Args, ValueEnum};

use hlsdk_client::types::{BasicOrder, FrontendOrder, L2Book, SuccessResponse};
use hlsdk_schema::{schema_for, Additional, DescribedSchema, NodeKind, SchemaNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    FrontendOpenOrders,
    OpenOrders,
    L2Book,
    SuccessResponse,
}

/// Arguments for the `hlsdk schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Response model to describe.
    #[arg(value_enum)]
    pub target: SchemaTarget,

    /// List schema paths instead of printing the document.
    #[arg(long)]
    pub paths: bool,
}

pub fn describe(target: SchemaTarget) -> Result<DescribedSchema> {
    let described = match target {
        SchemaTarget::FrontendOpenOrders => schema_for::<Vec<FrontendOrder>>()?,
        SchemaTarget::OpenOrders => schema_for::<Vec<BasicOrder>>()?,
        SchemaTarget::L2Book => schema_for::<L2Book>()?,
        SchemaTarget::SuccessResponse => schema_for::<SuccessResponse>()?,
    };
    Ok(described)
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let described = describe(args.target)?;
    if args.paths {
        let mut lines = Vec::new();
        list_paths(&described.root, &mut lines);
        println!("{}", lines.join("\n"));
    } else {
        println!("{}", serde_json::to_string_pretty(&described.document)?);
    }
    Ok(0)
}

fn list_paths(node: &SchemaNode, out: &mut Vec<String>) {
    let label = match &node.kind {
        NodeKind::Any => "any".to_string(),
        NodeKind::Primitive => node
            .types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("|"),
        NodeKind::Enum(values) => format!("enum({})", values.len()),
        NodeKind::Object(_) => "object".to_string(),
        NodeKind::Array(_) => "array".to_string(),
        NodeKind::Union(shape) => format!("{}({})", shape.keyword.as_str(), shape.branches.len()),
    };
    out.push(format!("{}  {label}", node.path));

    match &node.kind {
        NodeKind::Object(shape) => {
            for property in &shape.properties {
                list_paths(&property.node, out);
            }
            if let Additional::Schema(values) = &shape.additional {
                list_paths(values, out);
            }
        }
        NodeKind::Array(items) => list_paths(items, out),
        NodeKind::Union(shape) => {
            for branch in &shape.branches {
                list_paths(branch, out);
            }
        }
        NodeKind::Any | NodeKind::Primitive | NodeKind::Enum(_) => {}
    }
}
