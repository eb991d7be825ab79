//! Syntax utilities shared by the passes that read and rewrite trees.

pub mod node_utils;
