// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Executable program to run the network provider server

use clap::Parser;
use ovn_provider::run_openapi_external;
use ovn_provider::run_server;
use ovn_provider::Config;
use ovn_provider_common::cmd::fatal;
use ovn_provider_common::cmd::CmdError;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "ovn-provider", about = "Neutron-style OVN network provider")]
struct Args {
    #[clap(
        short = 'O',
        long = "openapi",
        help = "Print the external OpenAPI Spec document and exit"
    )]
    openapi: bool,

    #[clap(name = "CONFIG_FILE_PATH", action)]
    config_file_path: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(cmd_error) = do_run().await {
        fatal(cmd_error);
    }
}

async fn do_run() -> Result<(), CmdError> {
    let args = Args::parse();

    let config = Config::from_file(&args.config_file_path)
        .map_err(CmdError::Failure)?;

    if args.openapi {
        run_openapi_external()
    } else {
        run_server(&config).await.map_err(CmdError::Failure)
    }
}
