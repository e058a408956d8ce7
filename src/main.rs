use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use personal_signer::config::Settings;
use personal_signer::message_signer::SignatureParts;
use personal_signer::utils::crypto::strip_hex_prefix;
use personal_signer::{
    encode_typed_data, ether_to_wei, private_key_to_address, recover_personal_signer, sign_personal,
    sign_typed, verify_personal_sign, wei_to_ether, AddressResult, AmountResult, ApiResponse,
    CoreError, EncodedPayload, ErrorCode, VerificationResult,
};

/// Sign and verify Ethereum personal messages
#[derive(Parser)]
#[command(name = "personal-signer", version)]
struct Cli {
    /// Print a {success, data, error} JSON envelope instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Emit debug log lines on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode typed values, hash them and sign the hash as a personal message
    SignTyped {
        #[command(flatten)]
        values: TypedValues,

        /// Private key as 64 hex characters, with or without 0x
        #[arg(long)]
        key: String,
    },

    /// Sign a message with the personal_sign prefix
    PersonalSign {
        #[command(flatten)]
        message: MessageInput,

        /// Private key as 64 hex characters, with or without 0x
        #[arg(long)]
        key: String,
    },

    /// Check that a personal_sign signature was made by an address
    Verify {
        /// 65-byte signature as hex
        #[arg(long)]
        signature: String,

        #[command(flatten)]
        message: MessageInput,

        /// Expected signer, EIP-55 checksummed
        #[arg(long)]
        address: String,
    },

    /// Recover the address that made a personal_sign signature
    Recover {
        /// 65-byte signature as hex
        #[arg(long)]
        signature: String,

        #[command(flatten)]
        message: MessageInput,
    },

    /// Print the checksummed address of a private key
    Address {
        /// Private key as 64 hex characters, with or without 0x
        #[arg(long)]
        key: String,
    },

    /// Print the packed encoding of typed values
    Encode {
        #[command(flatten)]
        values: TypedValues,
    },

    /// Convert a wei amount to ether
    WeiToEther {
        /// Amount in wei, decimal
        amount: String,
    },

    /// Convert an ether amount to wei
    EtherToWei {
        /// Amount in ether, up to 18 decimals
        amount: String,
    },
}

#[derive(Args)]
struct TypedValues {
    /// Comma-separated type names, e.g. string,address,uint256
    #[arg(long, value_delimiter = ',')]
    types: Vec<String>,

    /// One value per type, repeated in order
    #[arg(long = "args", allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MessageInput {
    /// Message as UTF-8 text
    #[arg(long)]
    message: Option<String>,

    /// Message as hex bytes
    #[arg(long)]
    message_hex: Option<String>,
}

impl MessageInput {
    fn bytes(&self) -> Result<Vec<u8>> {
        match (&self.message, &self.message_hex) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(hex_str)) => hex::decode(strip_hex_prefix(hex_str))
                .context("--message-hex is not valid hex"),
            (None, None) => anyhow::bail!("a message is required"),
        }
    }
}

/// What a command produced, in both output modes
struct Rendered {
    text: String,
    data: serde_json::Value,
}

impl Rendered {
    fn new<T: Serialize>(data: &T, text: impl Into<String>) -> Result<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| CoreError::internal(format!("failed to serialize output: {}", e)))?;
        Ok(Self {
            text: text.into(),
            data,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let settings = Settings::from_env().with_overrides(cli.debug, cli.json);
    settings.apply();

    match run(&cli.command) {
        Ok(rendered) => {
            if settings.json_output {
                println!("{}", ApiResponse::ok(rendered.data).to_json());
            } else {
                println!("{}", rendered.text);
            }
        }
        Err(err) => {
            let core_error = match err.downcast_ref::<CoreError>() {
                Some(core_error) => core_error.clone(),
                None => CoreError::invalid_input(format!("{:#}", err)),
            };
            if core_error.code == ErrorCode::Internal {
                personal_signer::log_error!("cli", "command failed", message = core_error.message);
            } else {
                personal_signer::log_debug!("cli", "command failed", code = format!("{:?}", core_error.code));
            }

            if settings.json_output {
                let response: ApiResponse<()> = ApiResponse::err(core_error);
                println!("{}", response.to_json());
            } else {
                eprintln!("error: {}", core_error);
            }
            process::exit(1);
        }
    }
}

fn run(command: &Command) -> Result<Rendered> {
    match command {
        Command::SignTyped { values, key } => {
            let signature = sign_typed(&values.types, &values.args, key)?;
            Rendered::new(&SignatureParts::from(&signature), signature.to_hex())
        }
        Command::PersonalSign { message, key } => {
            let signature = sign_personal(message.bytes()?, key)?;
            Rendered::new(&SignatureParts::from(&signature), signature.to_hex())
        }
        Command::Verify {
            signature,
            message,
            address,
        } => {
            let result = VerificationResult::from(verify_personal_sign(signature, message.bytes()?, address)?);
            let text = if result.verified {
                format!("verified {}", result.address)
            } else {
                "not verified".to_string()
            };
            Rendered::new(&result, text)
        }
        Command::Recover { signature, message } => {
            let address = recover_personal_signer(signature, message.bytes()?)?;
            Rendered::new(&AddressResult { address: address.clone() }, address)
        }
        Command::Address { key } => {
            let address = private_key_to_address(key)?;
            Rendered::new(&AddressResult { address: address.clone() }, address)
        }
        Command::Encode { values } => {
            let encoded = EncodedPayload::from_bytes(&encode_typed_data(&values.types, &values.args)?);
            let text = encoded.payload.clone();
            Rendered::new(&encoded, text)
        }
        Command::WeiToEther { amount } => {
            let ether = wei_to_ether(amount)?;
            Rendered::new(
                &AmountResult {
                    amount: ether.clone(),
                    unit: "ether".to_string(),
                },
                ether,
            )
        }
        Command::EtherToWei { amount } => {
            let wei = ether_to_wei(amount)?;
            Rendered::new(
                &AmountResult {
                    amount: wei.clone(),
                    unit: "wei".to_string(),
                },
                wei,
            )
        }
    }
}
