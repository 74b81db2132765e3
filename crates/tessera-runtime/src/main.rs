// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Loads a glTF file into a reference host running on its own thread, boots a
//! sandbox against it, and prints the scene tree as the sandbox sees it.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::rc::Rc;
use std::time::Instant;
use tessera_sdk::prelude::*;
use tessera_sdk::{spawn_host, Sandbox, SceneGraph};

use crate::cli::Cli;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let graph = SceneGraph::open(&cli.path)?;
    let scene_count = graph.scenes().len();
    let (mut sandbox, host) =
        spawn_host(graph, cli.sandbox_config()).context("Failed to connect the sandbox")?;

    let deadline = Instant::now() + cli.timeout();
    while sandbox.kernel().elements::<Scene>().len() < scene_count {
        if Instant::now() >= deadline {
            bail!("Timed out waiting for the host to publish {scene_count} scenes");
        }
        sandbox.wait()?;
    }
    print_scenes(&sandbox);

    if let Some((from, to)) = cli.rename() {
        rename_materials(&mut sandbox, from, to, &cli)?;
        print_scenes(&sandbox);
    }

    drop(sandbox);
    if host.stop().is_none() {
        bail!("Host service thread panicked");
    }
    Ok(())
}

fn rename_materials(sandbox: &mut Sandbox, from: &str, to: &str, cli: &Cli) -> Result<()> {
    let targets: Vec<Rc<Material>> = sandbox
        .kernel()
        .elements::<Material>()
        .into_iter()
        .filter(|material| material.name().as_deref() == Some(from))
        .collect();
    if targets.is_empty() {
        log::warn!("No material named '{from}'.");
        return Ok(());
    }

    for material in targets {
        let mut pending = material.set_name(Some(to));
        match sandbox.resolve(&mut pending, cli.timeout()) {
            Some(Ok(receipt)) => {
                log::info!("Renamed material {} ({}).", receipt.id, receipt.sequence)
            }
            Some(Err(e)) => log::warn!("Could not rename material {}: {e}", material.id()),
            None => bail!("Timed out waiting for the host to acknowledge a rename"),
        }
    }
    Ok(())
}

fn print_scenes(sandbox: &Sandbox) {
    for scene in sandbox.kernel().elements::<Scene>() {
        println!("Scene {} ({})", label(scene.name()), scene.id());
        for node in scene.nodes() {
            print_node(&node, 1);
        }
    }
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}- {} {:?}", label(node.name()), node.translation());
    if let Some(mesh) = node.mesh() {
        println!("{indent}  mesh {}", label(mesh.name()));
        for primitive in mesh.primitives() {
            let material = primitive
                .material()
                .map_or_else(|| "<default>".to_owned(), |m| label(m.name()));
            println!(
                "{indent}    {:?} with {} attributes, material {material}",
                primitive.mode(),
                primitive.attributes().len()
            );
        }
    }
    for child in node.children() {
        print_node(&child, depth + 1);
    }
}

fn label(name: Option<String>) -> String {
    name.unwrap_or_else(|| "<unnamed>".to_owned())
}
