/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use tokio;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use edr_client::{load_config, make_dataset, DatasetTarget, EdrClientConfig, EdrInterface, HttpTransport};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "command line access to OGC EDR servers")]
pub struct Args {
    /// client config file (RON)
    #[arg(short,long, default_value = "edr_client.ron")]
    pub config: String,

    /// URI of the EDR server
    pub server: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// list the collections of the server
    Collections,

    /// show extents, query types and parameters of a collection
    Info { collection: String },

    /// list the locations of a collection
    Locations { collection: String },

    /// list the parameters of a collection
    Parameters { collection: String },

    /// run a locations query and print the retrieved datasets
    Query {
        collection: String,
        location: String,

        #[arg(short,long, value_delimiter=',', num_args=1..)]
        params: Vec<String>,

        #[arg(short,long)]
        start: String,

        #[arg(short,long)]
        end: String,
    },
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config: EdrClientConfig = load_config( &args.config).unwrap_or_default();
    let transport = HttpTransport::shared( &config)?;
    let edr = EdrInterface::connect( &args.server, transport).await?.with_locale( &config.locale);

    match &args.command {
        Command::Collections => {
            println!("{edr}");
        }
        Command::Info { collection } => {
            let coll = edr.get_collection(collection)?;
            println!("collection: {} ({})", coll.id, coll.title);
            if let Some(desc) = &coll.description { println!("  {desc}"); }

            match edr.get_spatial_extent(collection) {
                Ok((bbox,crs)) => println!("spatial extent: {:?} [{}]", bbox.to_minmax_array(), crs),
                Err(e) => println!("spatial extent: {e}")
            }
            match edr.get_temporal_extent(collection) {
                Ok((times,trs)) => {
                    match (times.first(), times.last()) {
                        (Some(first),Some(last)) => println!("temporal extent: {} .. {} ({} steps) [{}]", first, last, times.len(), trs),
                        _ => println!("temporal extent: none [{trs}]")
                    }
                }
                Err(e) => println!("temporal extent: {e}")
            }
            println!("query types: {}", edr.get_query_types(collection)?.join(", "));
        }
        Command::Locations { collection } => {
            for loc in edr.get_locations(collection).await? {
                println!("{loc}");
            }
        }
        Command::Parameters { collection } => {
            for (id,info) in edr.get_collection_parameters(collection)? {
                println!("{:<24} {}", id, info.description());
            }
        }
        Command::Query { collection, location, params, start, end } => {
            let mut handler = edr.query_locations( collection, location, params.as_slice(), start, end).await?;
            let infos = edr.get_collection_parameters(collection)?;
            let names: Vec<(String,String)> = params.iter()
                .map( |p| {
                    let label = infos.iter().find( |(id,_)| id == p).map( |(_,info)| info.label.clone()).unwrap_or_else( || p.clone());
                    (p.clone(), label)
                })
                .collect();

            for ds in make_dataset( &mut handler, &names, DatasetTarget::Grid).await?.into_vec() {
                println!("{ds}");
            }
        }
    }

    Ok(())
}
