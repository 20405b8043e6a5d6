//! OpenAPI descriptor consumed by the agent runtime to discover the tools.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

const TITLE: &str = "Token Claims Agent";

const INSTRUCTIONS: &str = "You answer user questions about token claims and vesting. \
When the user asks for a summary of their claims, present it as a centered Markdown table \
with the columns Claim, Type, Amount, Cliff, Vesting and Claimed?. Combine trancheId and index \
as `trancheId/index` in the Claim column, show only the numeric part of cliff and vesting, and \
use Y or N for Claimed?. Below the table note that durations are in months on Base and in days \
on Base Sepolia. If the user is connected to any other chain, say that token claims only apply \
on those networks and do not provide a summary. Claim, swap and delegate tools return an unsigned \
transaction for the user's wallet to sign.";

fn address_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": true,
        "description": description,
        "schema": { "$ref": "#/components/schemas/Address" }
    })
}

fn number_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": true,
        "description": description,
        "schema": { "type": "number" }
    })
}

fn number_list_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": true,
        "description": description,
        "schema": { "type": "string", "description": "Comma-separated list of numbers." },
        "example": "1,2,3"
    })
}

fn tool(operation_id: &str, summary: &str, parameters: Vec<Value>, response: Value) -> Value {
    json!({
        "get": {
            "operationId": operation_id,
            "summary": summary,
            "parameters": parameters,
            "responses": {
                "200": response,
                "400": { "$ref": "#/components/responses/Error" },
                "500": { "$ref": "#/components/responses/Error" },
                "502": { "$ref": "#/components/responses/Error" },
                "503": { "$ref": "#/components/responses/Error" }
            }
        }
    })
}

fn transaction_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "required": ["success", "transaction"],
                    "properties": {
                        "success": { "type": "boolean" },
                        "transaction": { "$ref": "#/components/schemas/SignRequest" },
                        "meta": { "type": "object" }
                    }
                }
            }
        }
    })
}

fn summary_response() -> Value {
    json!({
        "description": "Successful summary response",
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "required": ["success", "claims", "meta"],
                    "properties": {
                        "success": { "type": "boolean" },
                        "claims": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": [
                                    "trancheId", "index", "claimant", "claimableAmount", "proof",
                                    "claimType", "claimTypeName", "cliff", "vesting", "claimed"
                                ],
                                "properties": {
                                    "trancheId": { "type": "string" },
                                    "index": { "type": "number" },
                                    "claimant": { "$ref": "#/components/schemas/Address" },
                                    "claimableAmount": { "type": "string" },
                                    "proof": { "type": "array", "items": { "type": "string" } },
                                    "claimType": {
                                        "type": "integer",
                                        "description": "Numeric claim type for on-chain transaction"
                                    },
                                    "claimTypeName": {
                                        "type": "string",
                                        "description": "Human-readable claim type label"
                                    },
                                    "cliff": {
                                        "type": "string",
                                        "description": "Cliff period (e.g. \"12 months\" or \"12 days\")"
                                    },
                                    "vesting": {
                                        "type": "string",
                                        "description": "Vesting duration (e.g. \"24 months\" or \"24 days\")"
                                    },
                                    "claimed": {
                                        "type": "boolean",
                                        "description": "Whether this tranche/index has already been claimed on-chain"
                                    }
                                }
                            }
                        },
                        "meta": {
                            "type": "object",
                            "required": ["totalAmount", "trancheIds", "chainId", "claimedCount", "unclaimedCount"],
                            "properties": {
                                "totalAmount": { "type": "string" },
                                "trancheIds": { "type": "array", "items": { "type": "string" } },
                                "chainId": { "type": "integer" },
                                "claimedCount": { "type": "integer" },
                                "unclaimedCount": { "type": "integer" }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn object_response(description: &str, properties: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "object", "properties": properties }
            }
        }
    })
}

pub fn plugin_descriptor(plugin_url: &str, account_id: &str, chain_ids: &[u64]) -> Value {
    let claimant = || address_param("claimant", "Address holding the claims");
    let chain_id = || number_param("chainId", "Chain the user is connected to");

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": TITLE,
            "description": "API exposing state queries and transaction payloads for user actions on merkle token claims",
            "version": env!("CARGO_PKG_VERSION")
        },
        "servers": [{ "url": plugin_url }],
        "x-mb": {
            "account-id": account_id,
            "assistant": {
                "name": TITLE,
                "description": "An agent facilitating user actions and queries for token claims",
                "instructions": INSTRUCTIONS,
                "tools": [{ "type": "generate-evm-tx" }],
                "categories": ["token"],
                "chainIds": chain_ids
            }
        },
        "paths": {
            "/api/tools/summary": tool(
                "get-summary",
                "Summarize the claimant's merkle claims with vesting terms and claimed status",
                vec![claimant(), chain_id()],
                summary_response(),
            ),
            "/api/tools/balance": tool(
                "get-balance",
                "Virtual token balance and swappable balance of the claimant",
                vec![claimant(), chain_id()],
                object_response("Balances in wei", json!({
                    "success": { "type": "boolean" },
                    "data": {
                        "type": "object",
                        "properties": {
                            "balanceOf": { "type": "string" },
                            "swappableBalanceOf": { "type": "string" },
                            "chainId": { "type": "integer" },
                            "claimant": { "$ref": "#/components/schemas/Address" }
                        }
                    }
                })),
            ),
            "/api/tools/claim": tool(
                "claim",
                "Build a transaction claiming one tranche/index entry",
                vec![
                    claimant(),
                    chain_id(),
                    number_param("trancheId", "Tranche of the claim"),
                    number_param("index", "Index of the claim within the tranche"),
                ],
                transaction_response("Unsigned claim transaction"),
            ),
            "/api/tools/claim-many": tool(
                "claim-many",
                "Build one transaction claiming several tranche/index entries",
                vec![
                    claimant(),
                    chain_id(),
                    number_list_param("trancheIds", "Tranches, paired with indices by position"),
                    number_list_param("indices", "Indices, paired with trancheIds by position"),
                ],
                transaction_response("Unsigned claimMany transaction"),
            ),
            "/api/tools/swap-all": tool(
                "swap-all",
                "Build a transaction swapping all swappable virtual tokens for the base token",
                vec![claimant(), chain_id()],
                transaction_response("Unsigned swapAll transaction"),
            ),
            "/api/tools/delegate": tool(
                "delegate",
                "Build a transaction delegating virtual tokens to a registered agent",
                vec![
                    claimant(),
                    chain_id(),
                    address_param("agent", "Registered agent to delegate to"),
                    number_param("amount", "Amount in whole tokens, e.g. 1.5"),
                ],
                transaction_response("Unsigned delegate transaction"),
            ),
            "/api/tools/virtual-staking-status": tool(
                "virtual-staking-status",
                "Whether virtual staking is currently possible",
                vec![chain_id()],
                object_response("Virtual staking availability", json!({
                    "success": { "type": "boolean" },
                    "canVirtualStake": { "type": "boolean" },
                    "chainId": { "type": "integer" }
                })),
            ),
            "/api/tools/get-agents": tool(
                "get-agents",
                "List agents registered for staking",
                vec![chain_id()],
                object_response("Registered agents", json!({
                    "success": { "type": "boolean" },
                    "chainId": { "type": "integer" },
                    "agents": { "type": "array", "items": { "$ref": "#/components/schemas/Address" } }
                })),
            )
        },
        "components": {
            "schemas": {
                "Address": {
                    "type": "string",
                    "description": "20-byte EVM address, 0x-prefixed",
                    "pattern": "^0x[a-fA-F0-9]{40}$"
                },
                "SignRequest": {
                    "type": "object",
                    "required": ["method", "chainId", "params"],
                    "properties": {
                        "method": { "type": "string", "enum": ["eth_sendTransaction"] },
                        "chainId": { "type": "integer" },
                        "params": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["to", "value", "data"],
                                "properties": {
                                    "from": { "$ref": "#/components/schemas/Address" },
                                    "to": { "$ref": "#/components/schemas/Address" },
                                    "value": { "type": "string" },
                                    "data": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            },
            "responses": {
                "Error": {
                    "description": "Error response",
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "properties": {
                                    "code": { "type": "integer" },
                                    "message": { "type": "string" },
                                    "details": { "type": "object" },
                                    "timestamp": { "type": "integer" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub async fn get_plugin_descriptor(State(state): State<AppState>) -> Json<Value> {
    Json(plugin_descriptor(
        &state.server.plugin_url,
        &state.server.account_id,
        &state.registry.chain_ids(),
    ))
}
